//! # udyamx-store: Application-Local Storage for UdyamX
//!
//! Persists the inventory, saved invoices and the locale choice in a local
//! SQLite database, one JSON record per key.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        UdyamX Data Flow                                 │
//! │                                                                         │
//! │  Command (save_invoice)            Sync task (queued → sent)           │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   udyamx-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ Product /     │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ Invoice / KV  │    │ 001_app_...  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data dir>/udyamx.db                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use udyamx_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("udyamx.db")).await?;
//! let products = db.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::invoice::InvoiceRepository;
pub use repository::kv::LocalStore;
pub use repository::product::ProductRepository;
