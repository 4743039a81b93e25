//! # Connectivity Observer
//!
//! Holds the device's online flag. The host reports transitions through
//! [`ConnectivityObserver::set_online`]; nothing here polls the network.
//!
//! ```text
//! host event ──► set_online(bool) ──► watch::Sender<bool>
//!                                          │
//!                      ┌───────────────────┼──────────────────┐
//!                      ▼                   ▼                  ▼
//!                 is_online()        subscribe() rx      subscribe() rx
//!                 (header badge)     (invoice sync)      (...)
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Shared online/offline flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct ConnectivityObserver {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityObserver {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        ConnectivityObserver { tx: Arc::new(tx) }
    }

    /// Records a transition. Returns `true` when the value actually changed;
    /// repeated reports of the same state do not wake subscribers.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "Connectivity changed");
        }
        changed
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// A receiver that sees every later transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
