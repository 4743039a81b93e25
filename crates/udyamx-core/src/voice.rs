//! # Voice Invoice Dialogue
//!
//! The state machine behind hands-free invoice entry. It owns no audio and
//! no timers: the app feeds it [`VoiceEvent`]s and executes the
//! [`VoiceEffect`]s it returns.
//!
//! ## State Diagram
//! ```text
//!                 start()
//!   ┌──────┐  ───────────────►  ┌───────────────────────────┐
//!   │ Idle │                    │ Speaking(prompt, then)    │◄─────────────┐
//!   └──────┘  ◄──── then=End ── └─────────────┬─────────────┘              │
//!      ▲         PromptFinished               │ PromptFinished, then=Listen│
//!      │                                      ▼                            │
//!      │  other recognition error      ┌───────────┐  NoSpeech             │
//!      ├────────────────────────────── │ Listening │ ──────────────────────┤
//!      │                               └─────┬─────┘  ClientName step      │
//!      │                                     │ SpeechRecognized ───────────┤
//!      │                                     │ (Items step)                │
//!      │                                     ▼                             │
//!      │                              ┌────────────┐  applied / nothing    │
//!      │                              │ Processing │ ──────────────────────┘
//!      │                              └────────────┘
//!      │
//!      └──── close() from any state (idempotent)
//! ```
//!
//! ## Single Flight
//! Every session has an epoch. The app tags each event with the epoch of
//! the effect that produced it; events from an older epoch, or arriving
//! while idle, are dropped without touching anything.

use serde::{Deserialize, Serialize};

use crate::actions::{self, InvoiceActions};
use crate::inventory::PriceCatalog;
use crate::invoice::InvoiceDraft;

// =============================================================================
// Vocabulary
// =============================================================================

/// Something the dialogue says out loud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prompt {
    AskClientName,
    AskItems,
    /// Rows changed; "anything else?"
    ItemsUpdated,
    /// Nothing more to do; closing words.
    Confirmed,
    /// Nothing understood and nothing on the invoice yet.
    ParseError,
    /// Recognition heard silence.
    NoSpeech,
    /// Action extraction failed outright.
    ExtractionError,
}

impl Prompt {
    /// Translation key of the spoken text.
    pub fn key(&self) -> &'static str {
        match self {
            Prompt::AskClientName => "invoice.voice.askClientName",
            Prompt::AskItems => "invoice.voice.askItems",
            Prompt::ItemsUpdated => "invoice.voice.itemsUpdated",
            Prompt::Confirmed => "invoice.voice.confirmed",
            Prompt::ParseError => "invoice.voice.parseError",
            Prompt::NoSpeech => "invoice.voice.noSpeech",
            Prompt::ExtractionError => "invoice.voice.extractionError",
        }
    }
}

/// Which field the next utterance fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueStep {
    ClientName,
    Items,
}

/// What happens once a prompt finishes playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfterSpeech {
    Listen,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceState {
    Idle,
    Speaking { prompt: Prompt, then: AfterSpeech },
    Listening,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionErrorKind {
    /// Silence; recovered by re-prompting.
    NoSpeech,
    /// Capture stopped on request; ignored.
    Aborted,
    /// Anything else (permission denied, device lost, ...).
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    PromptFinished,
    SpeechRecognized(String),
    RecognitionError(RecognitionErrorKind),
    ActionsExtracted(InvoiceActions),
    ExtractionFailed,
}

/// Shown to the user outside the spoken dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceAlert {
    RecognitionFailed { error: String },
}

impl VoiceAlert {
    pub fn key(&self) -> &'static str {
        match self {
            VoiceAlert::RecognitionFailed { .. } => "copilot.errors.permission",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEffect {
    Speak(Prompt),
    StartListening,
    StopSpeaking,
    StopListening,
    /// Ask the AI gateway for actions in this transcript.
    ExtractActions(String),
    Alert(VoiceAlert),
    /// The session is over; the machine is idle.
    Ended,
}

/// Session identifier carried by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// Dialogue
// =============================================================================

#[derive(Debug, Clone)]
pub struct VoiceDialogue {
    state: VoiceState,
    step: DialogueStep,
    epoch: Epoch,
}

impl Default for VoiceDialogue {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceDialogue {
    pub fn new() -> Self {
        VoiceDialogue {
            state: VoiceState::Idle,
            step: DialogueStep::ClientName,
            epoch: Epoch(0),
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn step(&self) -> DialogueStep {
        self.step
    }

    /// Epoch of the current (or last) session.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn is_active(&self) -> bool {
        self.state != VoiceState::Idle
    }

    /// Begins a new session: clears the draft and asks for the client name.
    ///
    /// A session already in flight is stopped first and its epoch retired.
    pub fn start(&mut self, draft: &mut InvoiceDraft) -> (Epoch, Vec<VoiceEffect>) {
        let mut effects = Vec::new();
        if self.is_active() {
            effects.push(VoiceEffect::StopSpeaking);
            effects.push(VoiceEffect::StopListening);
        }

        self.epoch = Epoch(self.epoch.0 + 1);
        self.step = DialogueStep::ClientName;
        draft.clear_for_voice();
        effects.push(self.speak(Prompt::AskClientName, AfterSpeech::Listen));

        (self.epoch, effects)
    }

    /// Stops everything and returns to idle. Calling it again does nothing.
    pub fn close(&mut self) -> Vec<VoiceEffect> {
        if !self.is_active() {
            return Vec::new();
        }

        self.epoch = Epoch(self.epoch.0 + 1);
        self.state = VoiceState::Idle;
        vec![
            VoiceEffect::StopSpeaking,
            VoiceEffect::StopListening,
            VoiceEffect::Ended,
        ]
    }

    /// Feeds one event. Stale or out-of-place events return no effects.
    pub fn handle<C>(
        &mut self,
        epoch: Epoch,
        event: VoiceEvent,
        draft: &mut InvoiceDraft,
        catalog: &C,
    ) -> Vec<VoiceEffect>
    where
        C: PriceCatalog + ?Sized,
    {
        if epoch != self.epoch || !self.is_active() {
            return Vec::new();
        }

        match (self.state, event) {
            (VoiceState::Speaking { then, .. }, VoiceEvent::PromptFinished) => match then {
                AfterSpeech::Listen => {
                    self.state = VoiceState::Listening;
                    vec![VoiceEffect::StartListening]
                }
                AfterSpeech::End => self.finish(),
            },

            (VoiceState::Listening, VoiceEvent::SpeechRecognized(text)) => {
                let transcript = text.trim();
                if transcript.is_empty() {
                    return vec![self.speak(Prompt::NoSpeech, AfterSpeech::Listen)];
                }

                match self.step {
                    DialogueStep::ClientName => {
                        draft.set_client_name(transcript);
                        self.step = DialogueStep::Items;
                        vec![self.speak(Prompt::AskItems, AfterSpeech::Listen)]
                    }
                    DialogueStep::Items => {
                        self.state = VoiceState::Processing;
                        vec![VoiceEffect::ExtractActions(transcript.to_string())]
                    }
                }
            }

            (VoiceState::Listening, VoiceEvent::RecognitionError(kind)) => match kind {
                RecognitionErrorKind::NoSpeech => vec![self.speak(Prompt::NoSpeech, AfterSpeech::Listen)],
                RecognitionErrorKind::Aborted => Vec::new(),
                RecognitionErrorKind::Other(error) => {
                    let mut effects = vec![VoiceEffect::Alert(VoiceAlert::RecognitionFailed { error })];
                    effects.extend(self.finish());
                    effects
                }
            },

            (VoiceState::Processing, VoiceEvent::ActionsExtracted(extracted)) => {
                let summary = actions::apply(draft.items_mut(), &extracted, catalog);
                let effect = if summary.any() {
                    self.speak(Prompt::ItemsUpdated, AfterSpeech::Listen)
                } else if !draft.items().is_empty() {
                    self.speak(Prompt::Confirmed, AfterSpeech::End)
                } else {
                    self.speak(Prompt::ParseError, AfterSpeech::Listen)
                };
                vec![effect]
            }

            (VoiceState::Processing, VoiceEvent::ExtractionFailed) => {
                vec![self.speak(Prompt::ExtractionError, AfterSpeech::End)]
            }

            _ => Vec::new(),
        }
    }

    fn speak(&mut self, prompt: Prompt, then: AfterSpeech) -> VoiceEffect {
        self.state = VoiceState::Speaking { prompt, then };
        VoiceEffect::Speak(prompt)
    }

    fn finish(&mut self) -> Vec<VoiceEffect> {
        self.state = VoiceState::Idle;
        vec![VoiceEffect::Ended]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
