//! # udyamx-core: Pure Business Logic for UdyamX
//!
//! This crate is the **heart** of UdyamX. It contains the domain model and
//! every business rule as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         UdyamX Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal Shell (apps/udyamx)                 │   │
//! │  │   Dashboard ─ Co-Pilot ─ Invoice ─ Inventory ─ Network ─ ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ udyamx-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │  money   │ │ invoice  │ │inventory │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ actions  │ │  voice   │ │   i18n   │ │  print   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO TIMERS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        udyamx-store / udyamx-ai / udyamx-sync                   │   │
//! │  │     SQLite storage, Gemini gateway, connectivity + outbox       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Invoice, Notification, Tab, etc.)
//! - [`money`] - Money type with integer arithmetic (paise, no floating point)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//! - [`invoice`] - The editable invoice draft
//! - [`inventory`] - Barcode resolution and manual product entry
//! - [`actions`] - Spoken-invoice actions and their reconciliation
//! - [`voice`] - The voice invoice dialogue state machine
//! - [`i18n`] - Translation tables with English fallback
//! - [`print`] - Printable invoice document
//! - [`directory`] - Static business / scheme / loan directories
//! - [`dashboard`] - Dashboard figures and sales series
//!
//! ## Example Usage
//!
//! ```rust
//! use udyamx_core::invoice::InvoiceDraft;
//! use udyamx_core::money::Money;
//!
//! let mut draft = InvoiceDraft::new();
//! draft.set_client_name("Acme Bakery");
//! draft.edit_description(0, "Croissant").unwrap();
//! draft.edit_quantity(0, 2).unwrap();
//! draft.edit_price(0, Money::from_paise(2400)).unwrap();
//!
//! assert_eq!(draft.total().to_string(), "₹48.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod actions;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod i18n;
pub mod inventory;
pub mod invoice;
pub mod money;
pub mod print;
pub mod types;
pub mod validation;
pub mod voice;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use udyamx_core::Money` instead of
// `use udyamx_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the inventory record (JSON array of [`Product`]).
pub const INVENTORY_STORAGE_KEY: &str = "udyamx-inventory";

/// Storage key of the saved invoices record (JSON array of [`Invoice`]).
pub const INVOICES_STORAGE_KEY: &str = "udyamx-invoices";

/// Storage key of the persisted locale choice.
pub const LOCALE_STORAGE_KEY: &str = "udyamx-locale";

/// Maximum rows allowed on a single invoice.
///
/// ## Business Reason
/// A voice turn that keeps adding items must not grow the form without bound.
pub const MAX_INVOICE_ITEMS: usize = 100;

/// Maximum quantity of a single invoice line or manual stock entry.
pub const MAX_ITEM_QUANTITY: i64 = 99_999;

/// Maximum unit price of an invoice line: ₹1,00,00,000.
pub const MAX_ITEM_PRICE: Money = Money::from_paise(1_000_000_000);
