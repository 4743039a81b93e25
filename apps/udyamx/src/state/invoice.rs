//! # Invoice Draft State
//!
//! The invoice form being edited, shared between user commands and the
//! voice session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_row / edit_* / remove_row ──┐                                      │
//! │                                  ├──► Arc<Mutex<InvoiceDraft>>          │
//! │  voice session (apply actions) ──┘          │                           │
//! │                                             ▼                           │
//! │                                  save_draft ──► InvoiceRepository       │
//! │                                                                         │
//! │  Locks are held only for the synchronous mutation, never across an     │
//! │  await point.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use udyamx_core::invoice::InvoiceDraft;

#[derive(Debug, Clone, Default)]
pub struct InvoiceState {
    draft: Arc<Mutex<InvoiceDraft>>,
}

impl InvoiceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the draft.
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InvoiceDraft) -> R,
    {
        let draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&draft)
    }

    /// Executes a function with write access to the draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// invoice_state.with_draft_mut(|d| d.edit_quantity(0, 3))?;
    /// ```
    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut InvoiceDraft) -> R,
    {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut draft)
    }

    pub fn snapshot(&self) -> InvoiceDraft {
        self.with_draft(Clone::clone)
    }
}
