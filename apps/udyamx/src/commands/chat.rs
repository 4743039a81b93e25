//! # Co-Pilot Commands
//!
//! ```text
//! send_message("How do I price samosas?")
//!     │
//!     ├── blank, or a reply still pending ──► ignored (Ok(None))
//!     │
//!     ├── user message appended, loading = true
//!     ├── gateway.get_advice(...)      (never fails; fallback text on error)
//!     └── bot message appended, loading = false
//! ```
//!
//! No lock is held while the gateway is awaited. If the caller drops the
//! future mid-request, loading is cleared and no reply is appended.

use tracing::{debug, info};
use udyamx_core::voice::RecognitionErrorKind;
use udyamx_core::{ChatMessage, Sender};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppContext, ChatState};
use crate::voice::SpeechBackend;

/// Clears the loading flag unless the request finished with a reply.
struct PendingReply<'a> {
    chat: &'a ChatState,
    done: bool,
}

impl PendingReply<'_> {
    fn finish(mut self, reply: ChatMessage) {
        self.chat.finish_request(reply);
        self.done = true;
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.chat.cancel_request();
        }
    }
}

/// Sends a question to the Co-Pilot and returns the bot's reply.
pub async fn send_message(ctx: &AppContext, text: &str) -> ApiResult<Option<ChatMessage>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    if !ctx.chat.begin_request(ChatMessage::new(text, Sender::User)) {
        debug!("Reply still pending, message ignored");
        return Ok(None);
    }
    let pending = PendingReply {
        chat: &ctx.chat,
        done: false,
    };

    let reply = ctx.gateway.get_advice(text).await;
    let message = ChatMessage::new(reply, Sender::Bot);
    pending.finish(message.clone());

    info!(gateway = ctx.gateway.name(), chars = message.text.len(), "Co-Pilot replied");
    Ok(Some(message))
}

/// Captures one spoken question for the chat input.
///
/// Silence or a user abort gives an empty string. Any other capture error
/// raises the `copilot.errors.permission` alert.
pub async fn dictate(ctx: &AppContext) -> ApiResult<String> {
    let speech = require_speech(ctx)?;

    match speech.recognizer.listen(ctx.i18n.locale().speech_tag()).await {
        Ok(transcript) => Ok(transcript),
        Err(RecognitionErrorKind::NoSpeech) | Err(RecognitionErrorKind::Aborted) => Ok(String::new()),
        Err(RecognitionErrorKind::Other(error)) => {
            ctx.alerts
                .push(ctx.i18n.t_with("copilot.errors.permission", &[("error", &error)]));
            Err(ApiError::permission_denied(error))
        }
    }
}

/// Dictates a question and sends whatever was heard.
///
/// Resolves only after the recognizer got an utterance, so callers that
/// also feed the recognizer must run this on another task.
pub async fn ask_by_voice(ctx: &AppContext) -> ApiResult<Option<ChatMessage>> {
    let heard = dictate(ctx).await?;
    send_message(ctx, &heard).await
}

/// The speech backend, or `Unsupported` with the matching alert raised.
pub fn require_speech(ctx: &AppContext) -> ApiResult<&SpeechBackend> {
    ctx.speech.as_ref().ok_or_else(|| {
        ctx.alerts.push(ctx.i18n.t("copilot.errors.unsupported"));
        ApiError::unsupported("Speech is not available on this device")
    })
}
