//! # Notification State
//!
//! The in-app notification list behind the header bell.
//!
//! ```text
//!  push() ──► [newest, ..., oldest]     unread_count() ──► header badge
//!                    │
//!  click(id) ────────┴──► read = true ──► panel closed ──► Some(link tab)
//! ```
//!
//! Notifications are never deleted. The scheme announcement is injected
//! by a one-shot timer started at launch.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};
use udyamx_core::{Notification, Tab};

use super::i18n::I18nState;

#[derive(Debug, Default)]
struct Inner {
    items: Vec<Notification>,
    panel_open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    inner: Arc<Mutex<Inner>>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Inner) -> R,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut inner)
    }

    /// Adds a notification at the top of the list.
    pub fn push(&self, notification: Notification) {
        debug!(id = %notification.id, title = %notification.title, "Notification added");
        self.with_inner(|inner| inner.items.insert(0, notification));
    }

    /// Newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.with_inner(|inner| inner.items.clone())
    }

    pub fn unread_count(&self) -> usize {
        self.with_inner(|inner| inner.items.iter().filter(|n| !n.read).count())
    }

    pub fn toggle_panel(&self) -> bool {
        self.with_inner(|inner| {
            inner.panel_open = !inner.panel_open;
            inner.panel_open
        })
    }

    pub fn close_panel(&self) {
        self.with_inner(|inner| inner.panel_open = false);
    }

    pub fn is_panel_open(&self) -> bool {
        self.with_inner(|inner| inner.panel_open)
    }

    /// Marks a notification read and closes the panel.
    ///
    /// Returns the tab to open, or `None` when the id is unknown or the
    /// notification carries no link. An unknown id changes nothing.
    pub fn click(&self, id: &str) -> Option<Tab> {
        self.with_inner(|inner| {
            let notification = inner.items.iter_mut().find(|n| n.id == id)?;
            notification.read = true;
            let link = notification.link;
            inner.panel_open = false;
            link
        })
    }
}

/// Injects the "new scheme" notification after `delay`.
pub fn spawn_scheme_notification(
    notifications: NotificationState,
    i18n: I18nState,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        notifications.push(Notification::new(
            i18n.t("notifications.newScheme.title"),
            i18n.t("notifications.newScheme.message"),
            Some(Tab::Schemes),
        ));
        info!("Scheme notification delivered");
    })
}
