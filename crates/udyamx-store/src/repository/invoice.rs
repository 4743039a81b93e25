//! # Invoice Repository
//!
//! The saved invoices record (`udyamx-invoices`): a JSON array, empty by default.
//!
//! ## Status Transitions Owned Here
//! ```text
//! insert()                 → appends a Draft (built by InvoiceDraft::save)
//! mark_queued_as_sent()    → every Queued becomes Sent (the sync task)
//! ```
//! Totals are stored as saved and never recomputed.

use tracing::{debug, info};
use udyamx_core::{Invoice, InvoiceStatus, INVOICES_STORAGE_KEY};

use crate::error::DbResult;
use crate::repository::kv::LocalStore;

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    store: LocalStore,
}

impl InvoiceRepository {
    pub fn new(store: LocalStore) -> Self {
        InvoiceRepository { store }
    }

    /// All saved invoices, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        self.store.read(INVOICES_STORAGE_KEY, Vec::new()).await
    }

    /// Appends an invoice.
    pub async fn insert(&self, invoice: Invoice) -> DbResult<()> {
        debug!(id = %invoice.id, total = %invoice.total, "Saving invoice");
        self.store
            .update(INVOICES_STORAGE_KEY, Vec::new(), |invoices: &mut Vec<Invoice>| {
                invoices.push(invoice);
                Ok(())
            })
            .await
    }

    /// Overwrites the whole record.
    pub async fn replace_all(&self, invoices: &[Invoice]) -> DbResult<()> {
        self.store.write(INVOICES_STORAGE_KEY, invoices).await
    }

    pub async fn count_with_status(&self, status: InvoiceStatus) -> DbResult<usize> {
        Ok(self
            .list()
            .await?
            .iter()
            .filter(|inv| inv.status == status)
            .count())
    }

    /// Flips every queued invoice to sent and returns how many changed.
    pub async fn mark_queued_as_sent(&self) -> DbResult<usize> {
        if self.count_with_status(InvoiceStatus::Queued).await? == 0 {
            return Ok(0);
        }

        let flipped = self
            .store
            .update(INVOICES_STORAGE_KEY, Vec::new(), |invoices: &mut Vec<Invoice>| {
                let mut flipped = 0;
                for invoice in invoices.iter_mut().filter(|inv| inv.status == InvoiceStatus::Queued) {
                    invoice.status = InvoiceStatus::Sent;
                    flipped += 1;
                }
                Ok(flipped)
            })
            .await?;

        info!(count = flipped, "Queued invoices marked as sent");
        Ok(flipped)
    }
}
