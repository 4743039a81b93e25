//! # Voice Session
//!
//! Runs the voice invoice dialogue against real speech I/O.
//!
//! ## Actor Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  VoiceHandle ── start / stop ──► commands_rx ─┐                         │
//! │                                               ▼                         │
//! │                                  ┌────────────────────────┐             │
//! │                                  │      VoiceSession      │             │
//! │                                  │  owns VoiceDialogue    │             │
//! │                                  └───────────┬────────────┘             │
//! │                                              │ effects                  │
//! │          ┌───────────────────┬───────────────┼───────────────┐          │
//! │          ▼                   ▼               ▼               ▼          │
//! │   Speak (task)        StartListening   ExtractActions     Alert         │
//! │   synthesizer.speak   recognizer.listen gateway (timeout) AlertState    │
//! │          │                   │               │                          │
//! │          └─────── (epoch, VoiceEvent) ───────┘                          │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                     events_rx ──► dialogue.handle(...)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One synthesis or recognition runs at a time. Stop effects abort the
//! running task, so nothing keeps talking after a session is closed, and
//! any event a late task still manages to send carries a retired epoch.

pub mod console;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use udyamx_ai::AiGateway;
use udyamx_core::voice::{
    Epoch, Prompt, RecognitionErrorKind, VoiceAlert, VoiceDialogue, VoiceEffect, VoiceEvent, VoiceState,
};
use udyamx_core::Product;
use udyamx_store::ProductRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::{AlertState, I18nState, InvoiceState};

// =============================================================================
// Speech Backends
// =============================================================================

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

/// Text to speech. Resolves once the utterance has finished playing.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechError>;
}

/// Single-shot speech capture: one utterance, then stop.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen(&self, language: &str) -> Result<String, RecognitionErrorKind>;
}

/// A synthesizer and recognizer pair. Absent when the host has no speech.
#[derive(Clone)]
pub struct SpeechBackend {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}

/// What the session reads and writes besides speech.
#[derive(Clone)]
pub struct VoiceContext {
    pub invoice: InvoiceState,
    pub products: ProductRepository,
    pub gateway: Arc<dyn AiGateway>,
    pub i18n: I18nState,
    pub alerts: AlertState,
    pub extraction_timeout: Duration,
}

// =============================================================================
// Handle
// =============================================================================

enum VoiceCommand {
    Start(oneshot::Sender<ApiResult<()>>),
    Stop,
}

/// Handle for controlling the voice session task.
///
/// The task ends once every handle has been dropped.
#[derive(Clone)]
pub struct VoiceHandle {
    commands_tx: mpsc::Sender<VoiceCommand>,
    state: Arc<RwLock<VoiceState>>,
}

impl VoiceHandle {
    /// Begins a session, restarting one already in flight.
    ///
    /// ## Errors
    /// `UNSUPPORTED` when no speech backend is available.
    pub async fn start(&self) -> ApiResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands_tx
            .send(VoiceCommand::Start(reply_tx))
            .await
            .map_err(|_| ApiError::internal("Voice session is not running"))?;
        reply_rx
            .await
            .map_err(|_| ApiError::internal("Voice session is not running"))?
    }

    /// Cancels the session. Safe to call at any time, any number of times.
    pub async fn stop(&self) -> ApiResult<()> {
        self.commands_tx
            .send(VoiceCommand::Stop)
            .await
            .map_err(|_| ApiError::internal("Voice session is not running"))
    }

    pub fn state(&self) -> VoiceState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.state() != VoiceState::Idle
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct VoiceSession {
    dialogue: VoiceDialogue,
    backend: Option<SpeechBackend>,
    ctx: VoiceContext,
    unsupported_reported: bool,
    state: Arc<RwLock<VoiceState>>,
    commands_rx: mpsc::Receiver<VoiceCommand>,
    events_tx: mpsc::UnboundedSender<(Epoch, VoiceEvent)>,
    events_rx: mpsc::UnboundedReceiver<(Epoch, VoiceEvent)>,
    speaking: Option<JoinHandle<()>>,
    listening: Option<JoinHandle<()>>,
    extracting: Option<JoinHandle<()>>,
}

impl VoiceSession {
    pub fn new(ctx: VoiceContext, backend: Option<SpeechBackend>) -> (Self, VoiceHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(8);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = Arc::new(RwLock::new(VoiceState::Idle));

        let session = VoiceSession {
            dialogue: VoiceDialogue::new(),
            backend,
            ctx,
            unsupported_reported: false,
            state: state.clone(),
            commands_rx,
            events_tx,
            events_rx,
            speaking: None,
            listening: None,
            extracting: None,
        };

        (session, VoiceHandle { commands_tx, state })
    }

    /// Creates the session and spawns it on the current runtime.
    pub fn spawn(ctx: VoiceContext, backend: Option<SpeechBackend>) -> VoiceHandle {
        let (session, handle) = VoiceSession::new(ctx, backend);
        tokio::spawn(session.run());
        handle
    }

    pub async fn run(mut self) {
        info!(available = self.backend.is_some(), "Voice session starting");

        loop {
            tokio::select! {
                command = self.commands_rx.recv() => match command {
                    Some(VoiceCommand::Start(reply)) => {
                        let result = self.start();
                        let _ = reply.send(result);
                    }
                    Some(VoiceCommand::Stop) => self.stop(),
                    None => {
                        self.stop();
                        break;
                    }
                },
                Some((epoch, event)) = self.events_rx.recv() => {
                    self.on_event(epoch, event).await;
                }
            }
        }

        info!("Voice session stopped");
    }

    fn start(&mut self) -> ApiResult<()> {
        if self.backend.is_none() {
            if !self.unsupported_reported {
                self.unsupported_reported = true;
                self.ctx.alerts.push(self.ctx.i18n.t("copilot.errors.unsupported"));
            }
            return Err(ApiError::unsupported("Speech is not available on this device"));
        }

        let (epoch, effects) = self.ctx.invoice.with_draft_mut(|draft| self.dialogue.start(draft));
        info!(epoch = epoch.value(), "Voice invoice session started");
        self.execute(epoch, effects);
        Ok(())
    }

    fn stop(&mut self) {
        let effects = self.dialogue.close();
        let epoch = self.dialogue.epoch();
        self.execute(epoch, effects);
    }

    async fn on_event(&mut self, epoch: Epoch, event: VoiceEvent) {
        debug!(epoch = epoch.value(), ?event, "Voice event");

        let catalog = match event {
            VoiceEvent::ActionsExtracted(_) => self.catalog().await,
            _ => Vec::new(),
        };

        let effects = self
            .ctx
            .invoice
            .with_draft_mut(|draft| self.dialogue.handle(epoch, event, draft, catalog.as_slice()));
        self.execute(epoch, effects);
    }

    async fn catalog(&self) -> Vec<Product> {
        match self.ctx.products.list().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Inventory unavailable; spoken items keep price 0");
                Vec::new()
            }
        }
    }

    fn execute(&mut self, epoch: Epoch, effects: Vec<VoiceEffect>) {
        for effect in effects {
            match effect {
                VoiceEffect::Speak(prompt) => self.speak(epoch, prompt),
                VoiceEffect::StartListening => self.listen(epoch),
                VoiceEffect::StopSpeaking => abort(&mut self.speaking),
                VoiceEffect::StopListening => abort(&mut self.listening),
                VoiceEffect::ExtractActions(transcript) => self.extract(epoch, transcript),
                VoiceEffect::Alert(alert) => self.alert(alert),
                VoiceEffect::Ended => {
                    abort(&mut self.extracting);
                    info!(epoch = epoch.value(), "Voice invoice session ended");
                }
            }
        }

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = self.dialogue.state();
    }

    fn speak(&mut self, epoch: Epoch, prompt: Prompt) {
        let Some(backend) = &self.backend else { return };
        abort(&mut self.speaking);

        let synthesizer = backend.synthesizer.clone();
        let text = self.ctx.i18n.t(prompt.key());
        let language = self.ctx.i18n.locale().speech_tag();
        let events = self.events_tx.clone();

        self.speaking = Some(tokio::spawn(async move {
            if let Err(e) = synthesizer.speak(&text, language).await {
                warn!(error = %e, "Prompt could not be spoken");
            }
            let _ = events.send((epoch, VoiceEvent::PromptFinished));
        }));
    }

    fn listen(&mut self, epoch: Epoch) {
        let Some(backend) = &self.backend else { return };
        abort(&mut self.listening);

        let recognizer = backend.recognizer.clone();
        let language = self.ctx.i18n.locale().speech_tag();
        let events = self.events_tx.clone();

        self.listening = Some(tokio::spawn(async move {
            let event = match recognizer.listen(language).await {
                Ok(transcript) => VoiceEvent::SpeechRecognized(transcript),
                Err(kind) => VoiceEvent::RecognitionError(kind),
            };
            let _ = events.send((epoch, event));
        }));
    }

    fn extract(&mut self, epoch: Epoch, transcript: String) {
        abort(&mut self.extracting);

        let gateway = self.ctx.gateway.clone();
        let timeout = self.ctx.extraction_timeout;
        let events = self.events_tx.clone();

        self.extracting = Some(tokio::spawn(async move {
            let mut request = tokio::spawn(async move { gateway.parse_invoice_actions(&transcript).await });
            let event = match tokio::time::timeout(timeout, &mut request).await {
                Ok(Ok(actions)) => VoiceEvent::ActionsExtracted(actions),
                Ok(Err(e)) => {
                    warn!(error = %e, "Action extraction task failed");
                    VoiceEvent::ExtractionFailed
                }
                Err(_) => {
                    request.abort();
                    warn!(timeout_ms = timeout.as_millis() as u64, "Action extraction timed out");
                    VoiceEvent::ExtractionFailed
                }
            };
            let _ = events.send((epoch, event));
        }));
    }

    fn alert(&self, alert: VoiceAlert) {
        let message = match &alert {
            VoiceAlert::RecognitionFailed { error } => self.ctx.i18n.t_with(alert.key(), &[("error", error)]),
        };
        self.ctx.alerts.push(message);
    }
}

fn abort(task: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use udyamx_ai::CannedGateway;
    use udyamx_core::actions::{AddAction, InvoiceActions};
    use udyamx_core::i18n::{Locale, Translations};
    use udyamx_core::{InvoiceItem, Money};
    use udyamx_store::{Database, DbConfig};

    #[derive(Default)]
    struct RecordingSynthesizer {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynthesizer {
        async fn speak(&self, text: &str, _language: &str) -> Result<(), SpeechError> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Hands out scripted results, then waits forever.
    #[derive(Default)]
    struct ScriptedRecognizer {
        results: Mutex<VecDeque<Result<String, RecognitionErrorKind>>>,
    }

    impl ScriptedRecognizer {
        fn with(results: Vec<Result<String, RecognitionErrorKind>>) -> Self {
            ScriptedRecognizer {
                results: Mutex::new(results.into()),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        async fn listen(&self, _language: &str) -> Result<String, RecognitionErrorKind> {
            let next = self.results.lock().unwrap().pop_front();
            match next {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }

    struct NeverGateway;

    #[async_trait]
    impl AiGateway for NeverGateway {
        async fn get_advice(&self, _prompt: &str) -> String {
            std::future::pending().await
        }

        async fn parse_invoice_actions(&self, _spoken: &str) -> InvoiceActions {
            std::future::pending().await
        }

        fn name(&self) -> &'static str {
            "never"
        }
    }

    struct Fixture {
        handle: VoiceHandle,
        synthesizer: Arc<RecordingSynthesizer>,
        invoice: InvoiceState,
        alerts: AlertState,
    }

    impl Fixture {
        fn spoken(&self) -> Vec<String> {
            self.synthesizer.spoken.lock().unwrap().clone()
        }
    }

    async fn fixture(
        recognizer: ScriptedRecognizer,
        gateway: Arc<dyn AiGateway>,
        translations: Translations,
    ) -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let synthesizer = Arc::new(RecordingSynthesizer::default());
        let invoice = InvoiceState::new();
        let alerts = AlertState::new();

        let ctx = VoiceContext {
            invoice: invoice.clone(),
            products: db.products(),
            gateway,
            i18n: I18nState::new(translations, Locale::En),
            alerts: alerts.clone(),
            extraction_timeout: Duration::from_millis(100),
        };
        let backend = SpeechBackend {
            synthesizer: synthesizer.clone(),
            recognizer: Arc::new(recognizer),
        };

        Fixture {
            handle: VoiceSession::spawn(ctx, Some(backend)),
            synthesizer,
            invoice,
            alerts,
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..300 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    fn add(description: &str, quantity: i64) -> InvoiceActions {
        InvoiceActions {
            add: Some(vec![AddAction {
                description: description.to_string(),
                quantity,
                price: Money::zero(),
            }]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dialogue_fills_the_draft_with_catalog_prices() {
        let gateway = Arc::new(CannedGateway::new());
        gateway.push_actions(add("Handmade Soap", 2));
        let f = fixture(
            ScriptedRecognizer::with(vec![Ok("Acme Bakery".into()), Ok("do handmade soap".into())]),
            gateway,
            Translations::empty(),
        )
        .await;

        f.handle.start().await.unwrap();
        wait_until(|| f.spoken().len() == 3).await;

        assert_eq!(
            f.spoken(),
            vec![
                "invoice.voice.askClientName",
                "invoice.voice.askItems",
                "invoice.voice.itemsUpdated"
            ]
        );
        let draft = f.invoice.snapshot();
        assert_eq!(draft.client_name(), "Acme Bakery");
        assert_eq!(draft.items(), &[InvoiceItem::new("Handmade Soap", 2, Money::from_paise(599))]);

        wait_until(|| f.handle.state() == VoiceState::Listening).await;
        f.handle.stop().await.unwrap();
        wait_until(|| f.handle.state() == VoiceState::Idle).await;
    }

    #[tokio::test]
    async fn test_nothing_new_with_items_ends_with_confirmation() {
        let gateway = Arc::new(CannedGateway::new());
        gateway.push_actions(add("Bread", 1));
        gateway.push_actions(InvoiceActions::default());
        let f = fixture(
            ScriptedRecognizer::with(vec![Ok("Acme".into()), Ok("bread".into()), Ok("that's all".into())]),
            gateway,
            Translations::empty(),
        )
        .await;

        f.handle.start().await.unwrap();
        wait_until(|| f.spoken().len() == 4 && !f.handle.is_active()).await;

        assert_eq!(f.spoken()[3], "invoice.voice.confirmed");
        assert_eq!(f.invoice.snapshot().items().len(), 1);
    }

    #[tokio::test]
    async fn test_silence_reprompts_and_blank_transcript_counts_as_silence() {
        let f = fixture(
            ScriptedRecognizer::with(vec![Err(RecognitionErrorKind::NoSpeech), Ok("   ".into())]),
            Arc::new(CannedGateway::new()),
            Translations::empty(),
        )
        .await;

        f.handle.start().await.unwrap();
        wait_until(|| f.spoken().len() == 3).await;

        assert_eq!(
            f.spoken(),
            vec![
                "invoice.voice.askClientName",
                "invoice.voice.noSpeech",
                "invoice.voice.noSpeech"
            ]
        );
        assert!(f.handle.is_active());
        f.handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_recognition_failure_alerts_and_ends() {
        let translations = Translations::from_tables([(
            Locale::En,
            serde_json::json!({"copilot": {"errors": {"permission": "Microphone error: {error}"}}}),
        )]);
        let f = fixture(
            ScriptedRecognizer::with(vec![Err(RecognitionErrorKind::Other("not-allowed".into()))]),
            Arc::new(CannedGateway::new()),
            translations,
        )
        .await;

        f.handle.start().await.unwrap();
        wait_until(|| !f.alerts.is_empty()).await;

        assert_eq!(f.alerts.drain(), vec!["Microphone error: not-allowed"]);
        wait_until(|| !f.handle.is_active()).await;
    }

    #[tokio::test]
    async fn test_extraction_timeout_speaks_error_and_ends() {
        let f = fixture(
            ScriptedRecognizer::with(vec![Ok("Acme".into()), Ok("two soap".into())]),
            Arc::new(NeverGateway),
            Translations::empty(),
        )
        .await;

        f.handle.start().await.unwrap();
        wait_until(|| f.spoken().len() == 3 && !f.handle.is_active()).await;

        assert_eq!(f.spoken()[2], "invoice.voice.extractionError");
    }

    #[tokio::test]
    async fn test_double_stop_stays_idle() {
        let f = fixture(
            ScriptedRecognizer::default(),
            Arc::new(CannedGateway::new()),
            Translations::empty(),
        )
        .await;

        f.handle.start().await.unwrap();
        wait_until(|| f.handle.state() == VoiceState::Listening).await;

        f.handle.stop().await.unwrap();
        f.handle.stop().await.unwrap();
        wait_until(|| f.handle.state() == VoiceState::Idle).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(f.handle.state(), VoiceState::Idle);
        assert_eq!(f.spoken().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_backend_alerts_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let alerts = AlertState::new();
        let ctx = VoiceContext {
            invoice: InvoiceState::new(),
            products: db.products(),
            gateway: Arc::new(CannedGateway::new()),
            i18n: I18nState::new(Translations::empty(), Locale::En),
            alerts: alerts.clone(),
            extraction_timeout: Duration::from_secs(1),
        };
        let handle = VoiceSession::spawn(ctx, None);

        let first = handle.start().await.unwrap_err();
        let second = handle.start().await.unwrap_err();

        assert_eq!(first.code, crate::error::ErrorCode::Unsupported);
        assert_eq!(second.code, crate::error::ErrorCode::Unsupported);
        assert_eq!(alerts.drain(), vec!["copilot.errors.unsupported"]);
        assert_eq!(handle.state(), VoiceState::Idle);
    }
}
