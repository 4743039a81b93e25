//! # State Module
//!
//! Everything the shell and the background tasks share.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │ InvoiceState │ │  ChatState   │ │Notification- │ │  AlertState  │   │
//! │  │ Arc<Mutex<   │ │ transcript + │ │    State     │ │ pending      │   │
//! │  │ InvoiceDraft>│ │ loading flag │ │ list + panel │ │ messages     │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │  I18nState   │ │   NavState   │ │ Connectivity │ │ VoiceHandle  │   │
//! │  │ tables +     │ │ tab, period, │ │   Observer   │ │ voice actor  │   │
//! │  │ locale       │ │ search       │ │ online flag  │ │              │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  All of it lives in one AppContext passed to every command. Each part  │
//! │  is a cheap clone over shared interior state.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod alerts;
mod chat;
pub mod config;
mod i18n;
mod invoice;
mod nav;
mod notifications;
mod sync;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use udyamx_ai::AiGateway;
use udyamx_core::i18n::{Locale, Translations};
use udyamx_core::LOCALE_STORAGE_KEY;
use udyamx_store::Database;
use udyamx_sync::ConnectivityObserver;

use crate::voice::{SpeechBackend, VoiceContext, VoiceHandle, VoiceSession};

pub use alerts::AlertState;
pub use chat::ChatState;
pub use config::{AppConfig, ConfigError};
pub use i18n::{load_translations, I18nState};
pub use invoice::InvoiceState;
pub use nav::NavState;
pub use notifications::{spawn_scheme_notification, NotificationState};
pub use sync::AppSyncEmitter;

/// Application context handed to every command.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub i18n: I18nState,
    pub notifications: NotificationState,
    pub alerts: AlertState,
    pub invoice: InvoiceState,
    pub chat: ChatState,
    pub nav: NavState,
    pub gateway: Arc<dyn AiGateway>,
    pub connectivity: ConnectivityObserver,
    /// `None` when the host has no speech support or voice is disabled.
    pub speech: Option<SpeechBackend>,
    pub voice: VoiceHandle,
}

impl AppContext {
    /// Builds the context and starts the voice session task.
    ///
    /// The persisted locale is restored here; an unreadable value falls
    /// back to English.
    pub async fn new(
        config: AppConfig,
        db: Database,
        translations: Translations,
        gateway: Arc<dyn AiGateway>,
        speech: Option<SpeechBackend>,
    ) -> Self {
        let locale = match db.storage().read(LOCALE_STORAGE_KEY, Locale::default()).await {
            Ok(locale) => locale,
            Err(e) => {
                warn!(error = %e, "Could not restore locale, using English");
                Locale::default()
            }
        };
        info!(%locale, gateway = gateway.name(), "Building application context");

        let speech = if config.voice.enabled { speech } else { None };

        let i18n = I18nState::new(translations, locale);
        let alerts = AlertState::new();
        let invoice = InvoiceState::new();
        let chat = ChatState::with_welcome(i18n.t("copilot.welcome"));

        let voice = VoiceSession::spawn(
            VoiceContext {
                invoice: invoice.clone(),
                products: db.products(),
                gateway: gateway.clone(),
                i18n: i18n.clone(),
                alerts: alerts.clone(),
                extraction_timeout: Duration::from_secs(config.voice.extraction_timeout_secs),
            },
            speech.clone(),
        );

        AppContext {
            config: Arc::new(config),
            db,
            i18n,
            notifications: NotificationState::new(),
            alerts,
            invoice,
            chat,
            nav: NavState::new(),
            gateway,
            connectivity: ConnectivityObserver::new(true),
            speech,
            voice,
        }
    }

    /// Emitter wiring sync results into alerts and notifications.
    pub fn sync_emitter(&self) -> AppSyncEmitter {
        AppSyncEmitter::new(self.i18n.clone(), self.alerts.clone(), self.notifications.clone())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use udyamx_ai::CannedGateway;
    use udyamx_store::DbConfig;

    #[tokio::test]
    async fn test_restores_persisted_locale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.storage().write(LOCALE_STORAGE_KEY, &Locale::Mr).await.unwrap();

        let ctx = AppContext::new(
            AppConfig::default(),
            db,
            Translations::empty(),
            Arc::new(CannedGateway::new()),
            None,
        )
        .await;

        assert_eq!(ctx.i18n.locale(), Locale::Mr);
        assert_eq!(ctx.chat.messages().len(), 1);
        assert!(ctx.connectivity.is_online());
    }
}
