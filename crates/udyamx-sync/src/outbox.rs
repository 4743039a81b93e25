//! # Queued Invoice Sync
//!
//! Moves `queued` invoices to `sent` once the device is back online.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  offline ──► online transition (or online at start)                     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │           any queued invoices? ── no ──► wait for next transition       │
//! │                    │ yes                                                │
//! │                    ▼                                                    │
//! │           sleep(delay)                                                  │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │           still online? ── no ──► skip, retried at next transition      │
//! │                    │ yes                                                │
//! │                    ▼                                                    │
//! │           mark_queued_as_sent() → n                                     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │           n > 0 → emitter.emit_synced(n)   (one notification)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, error, info};

use udyamx_core::InvoiceStatus;
use udyamx_store::InvoiceRepository;

use crate::config::SyncSettings;
use crate::connectivity::ConnectivityObserver;
use crate::error::{SyncError, SyncResult};

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives sync outcomes (implemented by the app's notification layer).
pub trait SyncEventEmitter: Send + Sync {
    /// `count` invoices just moved from queued to sent.
    fn emit_synced(&self, count: usize);

    /// A flip attempt failed; it will be retried at the next transition.
    fn emit_error(&self, message: &str);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl SyncEventEmitter for NoOpEmitter {
    fn emit_synced(&self, _count: usize) {}
    fn emit_error(&self, _message: &str) {}
}

// =============================================================================
// Sync Status
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    /// Invoices flipped since the task started.
    pub total_synced: usize,

    /// When the last flip happened.
    pub last_sync: Option<DateTime<Utc>>,

    /// Last error message (if any).
    pub last_error: Option<String>,
}

// =============================================================================
// Queued Invoice Sync
// =============================================================================

pub struct QueuedInvoiceSync {
    invoices: InvoiceRepository,
    connectivity: ConnectivityObserver,
    delay: Duration,
    emitter: Arc<dyn SyncEventEmitter>,
    status: Arc<RwLock<SyncStatus>>,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for controlling the sync task.
#[derive(Clone)]
pub struct QueuedInvoiceSyncHandle {
    shutdown_tx: mpsc::Sender<()>,
    status: Arc<RwLock<SyncStatus>>,
}

impl QueuedInvoiceSyncHandle {
    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Triggers graceful shutdown.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelError("Shutdown channel closed".into()))
    }
}

impl QueuedInvoiceSync {
    pub fn new(
        invoices: InvoiceRepository,
        connectivity: ConnectivityObserver,
        settings: &SyncSettings,
        emitter: Arc<dyn SyncEventEmitter>,
    ) -> (Self, QueuedInvoiceSyncHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let status = Arc::new(RwLock::new(SyncStatus::default()));

        let task = QueuedInvoiceSync {
            invoices,
            connectivity,
            delay: settings.delay(),
            emitter,
            status: status.clone(),
            shutdown_rx,
        };

        (task, QueuedInvoiceSyncHandle { shutdown_tx, status })
    }

    /// Runs until shutdown. Spawn this as a background task.
    pub async fn run(mut self) {
        info!(delay_ms = self.delay.as_millis() as u64, "Queued invoice sync starting");

        let mut online_rx = self.connectivity.subscribe();

        // Starting online counts as a transition.
        let mut pending = *online_rx.borrow_and_update();

        loop {
            if pending {
                pending = false;
                if !self.on_online(&online_rx).await {
                    break;
                }
            }

            tokio::select! {
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        debug!("Connectivity observer dropped");
                        break;
                    }
                    pending = *online_rx.borrow_and_update();
                }

                _ = self.shutdown_rx.recv() => {
                    break;
                }
            }
        }

        info!("Queued invoice sync stopped");
    }

    /// Handles one online transition. Returns `false` when shutdown was
    /// requested during the delay.
    async fn on_online(&mut self, online_rx: &watch::Receiver<bool>) -> bool {
        match self.invoices.count_with_status(InvoiceStatus::Queued).await {
            Ok(0) => {
                debug!("Online, nothing queued");
                return true;
            }
            Ok(count) => debug!(count, "Online with queued invoices, waiting before sync"),
            Err(e) => {
                self.record_error(SyncError::from(e)).await;
                return true;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = self.shutdown_rx.recv() => return false,
        }

        if !*online_rx.borrow() {
            info!("Went offline during sync delay, skipping");
            return true;
        }

        match self.flush().await {
            Ok(_) => {}
            Err(e) => self.record_error(e).await,
        }
        true
    }

    async fn flush(&self) -> SyncResult<usize> {
        let count = self.invoices.mark_queued_as_sent().await?;
        if count > 0 {
            {
                let mut status = self.status.write().await;
                status.total_synced += count;
                status.last_sync = Some(Utc::now());
                status.last_error = None;
            }
            self.emitter.emit_synced(count);
        }
        Ok(count)
    }

    async fn record_error(&self, err: SyncError) {
        error!(error = %err, "Queued invoice sync failed");
        self.status.write().await.last_error = Some(err.to_string());
        self.emitter.emit_error(&err.to_string());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use udyamx_core::{Invoice, InvoiceItem, Money};
    use udyamx_store::{Database, DbConfig};

    #[derive(Default)]
    struct RecordingEmitter {
        synced: Mutex<Vec<usize>>,
    }

    impl SyncEventEmitter for RecordingEmitter {
        fn emit_synced(&self, count: usize) {
            self.synced.lock().unwrap().push(count);
        }
        fn emit_error(&self, _message: &str) {}
    }

    impl RecordingEmitter {
        fn calls(&self) -> Vec<usize> {
            self.synced.lock().unwrap().clone()
        }
    }

    fn invoice(status: InvoiceStatus) -> Invoice {
        Invoice {
            id: format!("inv-{status}"),
            client_name: "Asha Traders".to_string(),
            items: vec![InvoiceItem::new("Soap", 2, Money::from_paise(5990))],
            total: Money::from_paise(11980),
            status,
            created_at: Utc::now(),
        }
    }

    async fn setup(statuses: &[InvoiceStatus]) -> InvoiceRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();
        for status in statuses {
            repo.insert(invoice(*status)).await.unwrap();
        }
        repo
    }

    fn spawn(
        repo: &InvoiceRepository,
        observer: &ConnectivityObserver,
        delay_ms: u64,
    ) -> (Arc<RecordingEmitter>, QueuedInvoiceSyncHandle) {
        let emitter = Arc::new(RecordingEmitter::default());
        let (task, handle) = QueuedInvoiceSync::new(
            repo.clone(),
            observer.clone(),
            &SyncSettings { delay_ms },
            emitter.clone(),
        );
        tokio::spawn(task.run());
        (emitter, handle)
    }

    async fn wait_for_sync(emitter: &RecordingEmitter) {
        for _ in 0..200 {
            if !emitter.calls().is_empty() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_offline_to_online_flips_queued_once() {
        let repo = setup(&[InvoiceStatus::Queued, InvoiceStatus::Draft]).await;
        let observer = ConnectivityObserver::new(false);
        let (emitter, handle) = spawn(&repo, &observer, 20);

        observer.set_online(true);
        wait_for_sync(&emitter).await;
        // Give a stray second emission time to show up.
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(emitter.calls(), vec![1]);
        assert_eq!(repo.count_with_status(InvoiceStatus::Queued).await.unwrap(), 0);
        assert_eq!(repo.count_with_status(InvoiceStatus::Sent).await.unwrap(), 1);
        assert_eq!(repo.count_with_status(InvoiceStatus::Draft).await.unwrap(), 1);

        let status = handle.status().await;
        assert_eq!(status.total_synced, 1);
        assert!(status.last_sync.is_some());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_online_at_start_counts_as_transition() {
        let repo = setup(&[InvoiceStatus::Queued, InvoiceStatus::Queued]).await;
        let observer = ConnectivityObserver::new(true);
        let (emitter, handle) = spawn(&repo, &observer, 10);

        wait_for_sync(&emitter).await;
        assert_eq!(emitter.calls(), vec![2]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_going_offline_during_delay_skips_flip() {
        let repo = setup(&[InvoiceStatus::Queued]).await;
        let observer = ConnectivityObserver::new(false);
        let (emitter, handle) = spawn(&repo, &observer, 150);

        observer.set_online(true);
        tokio::time::sleep(Duration::from_millis(30)).await;
        observer.set_online(false);
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(emitter.calls().is_empty());
        assert_eq!(repo.count_with_status(InvoiceStatus::Queued).await.unwrap(), 1);

        // Retried at the next transition.
        observer.set_online(true);
        wait_for_sync(&emitter).await;
        assert_eq!(emitter.calls(), vec![1]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_nothing_queued_emits_nothing() {
        let repo = setup(&[InvoiceStatus::Draft, InvoiceStatus::Paid]).await;
        let observer = ConnectivityObserver::new(false);
        let (emitter, handle) = spawn(&repo, &observer, 5);

        observer.set_online(true);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(emitter.calls().is_empty());
        assert_eq!(handle.status().await.total_synced, 0);

        handle.shutdown().await.unwrap();
    }
}
