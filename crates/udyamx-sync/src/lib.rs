//! # udyamx-sync: Connectivity and Queued Invoice Sync
//!
//! Offline-first: invoices marked `queued` wait in local storage and are
//! moved to `sent` shortly after the device reports it is back online.
//!
//! ## Module Organization
//! - [`connectivity`] - shared online flag fed by host transition events
//! - [`outbox`] - `QueuedInvoiceSync` actor and the `SyncEventEmitter` trait
//! - [`config`] - sync settings (`[sync]` table)
//! - [`error`] - sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use udyamx_sync::{ConnectivityObserver, NoOpEmitter, QueuedInvoiceSync, SyncSettings};
//!
//! let connectivity = ConnectivityObserver::new(true);
//! let (task, handle) = QueuedInvoiceSync::new(
//!     db.invoices(),
//!     connectivity.clone(),
//!     &SyncSettings::default(),
//!     Arc::new(NoOpEmitter),
//! );
//! tokio::spawn(task.run());
//!
//! connectivity.set_online(false);
//! ```

pub mod config;
pub mod connectivity;
pub mod error;
pub mod outbox;

pub use config::SyncSettings;
pub use connectivity::ConnectivityObserver;
pub use error::{SyncError, SyncResult};
pub use outbox::{NoOpEmitter, QueuedInvoiceSync, QueuedInvoiceSyncHandle, SyncEventEmitter, SyncStatus};
