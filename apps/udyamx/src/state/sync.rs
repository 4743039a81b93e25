//! # Sync State Module
//!
//! Bridges the queued-invoice sync task to the user.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QueuedInvoiceSync (background task)                                    │
//! │         │                                                               │
//! │         │ emit_synced(count)                                            │
//! │         ▼                                                               │
//! │  AppSyncEmitter                                                         │
//! │         ├──► AlertState          "{count} queued invoices sent"         │
//! │         └──► NotificationState   same text, links to the Invoice tab    │
//! │                                                                         │
//! │  emit_error(message) is logged only; the flip is retried at the next   │
//! │  online transition.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};
use udyamx_core::{Notification, Tab};
use udyamx_sync::SyncEventEmitter;

use super::alerts::AlertState;
use super::i18n::I18nState;
use super::notifications::NotificationState;

/// Sync event emitter that surfaces results in the shell.
#[derive(Debug, Clone)]
pub struct AppSyncEmitter {
    i18n: I18nState,
    alerts: AlertState,
    notifications: NotificationState,
}

impl AppSyncEmitter {
    pub fn new(i18n: I18nState, alerts: AlertState, notifications: NotificationState) -> Self {
        Self {
            i18n,
            alerts,
            notifications,
        }
    }
}

impl SyncEventEmitter for AppSyncEmitter {
    fn emit_synced(&self, count: usize) {
        let message = self
            .i18n
            .t_with("invoice.alerts.syncMessage", &[("count", &count.to_string())]);

        self.alerts.push(message.clone());
        self.notifications.push(Notification::new(
            self.i18n.t("invoice.savedInvoicesTitle"),
            message,
            Some(Tab::Invoice),
        ));

        info!(count, "Queued invoices synced");
    }

    fn emit_error(&self, message: &str) {
        warn!(message, "Queued invoice sync failed");
    }
}
