//! # Alert State
//!
//! Blocking messages the shell shows once and then forgets: validation
//! failures, scanner results, sync counts, voice errors.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

/// FIFO of pending alerts, shared by commands and background tasks.
#[derive(Debug, Clone, Default)]
pub struct AlertState {
    pending: Arc<Mutex<VecDeque<String>>>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "Alert raised");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message);
    }

    /// Takes every pending alert in the order raised.
    pub fn drain(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}
