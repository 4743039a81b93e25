//! # Repository Module
//!
//! Typed access to the named records in application-local storage.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command                                                               │
//! │       │  db.products().insert(product)                                 │
//! │       ▼                                                                 │
//! │  ProductRepository / InvoiceRepository                                 │
//! │       │  whole-record read-modify-write                                │
//! │       ▼                                                                 │
//! │  LocalStore (key → JSON text)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  app_storage table                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::LocalStore`] - Raw named records
//! - [`product::ProductRepository`] - Inventory
//! - [`invoice::InvoiceRepository`] - Saved invoices

pub mod invoice;
pub mod kv;
pub mod product;
