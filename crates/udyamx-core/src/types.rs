//! # Domain Types
//!
//! Core domain types used throughout UdyamX.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Invoice     │   │  Notification   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id             │       │
//! │  │  sku (business) │   │  client_name    │   │  title/message  │       │
//! │  │  name           │   │  items[]        │   │  read           │       │
//! │  │  quantity       │   │  total (frozen) │   │  link → Tab     │       │
//! │  │  price (paise)  │   │  status         │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InvoiceItem    │   │  InvoiceStatus  │   │      Tab        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  description    │   │  Draft          │   │  Dashboard (*)  │       │
//! │  │  quantity       │   │  Queued         │   │  Copilot ...    │       │
//! │  │  price          │   │  Sent / Paid    │   │  Profile        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products carry both:
//! - `id`: UUID v4 - immutable
//! - `sku`: human-readable business key, unique across the inventory
//!
//! Invoice items have no identity at all: they are positional rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A stock item in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier, unique per product.
    pub sku: String,

    /// Units on hand.
    pub quantity: i64,

    /// Unit price in paise.
    pub price: Money,
}

impl Product {
    /// Creates a product with a fresh UUID.
    pub fn new(name: impl Into<String>, sku: impl Into<String>, quantity: i64, price: Money) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            sku: sku.into(),
            quantity,
            price,
        }
    }

    /// The three products a fresh install starts with.
    pub fn starter_inventory() -> Vec<Product> {
        vec![
            Product::new("Handmade Soap", "HSOAP-001", 45, Money::from_paise(599)),
            Product::new("Scented Candle", "SCAND-002", 60, Money::from_paise(1250)),
            Product::new("Artisan Bread", "ABRD-001", 15, Money::from_paise(700)),
        ]
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// One row of an invoice. Positional; rows have no identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: i64,
    pub price: Money,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: i64, price: Money) -> Self {
        Self {
            description: description.into(),
            quantity,
            price,
        }
    }

    /// The blank row the form starts with: empty description, quantity 1.
    pub fn blank() -> Self {
        Self::new("", 1, Money::zero())
    }

    /// quantity × price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// Lifecycle of a saved invoice.
///
/// ```text
/// Draft ──(external)──► Queued ──(back online)──► Sent ──► Paid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Saved locally from the form.
    Draft,
    /// Waiting for connectivity to be sent.
    Queued,
    /// Delivered.
    Sent,
    /// Settled by the client.
    Paid,
}

impl InvoiceStatus {
    /// Translation key of the status badge.
    pub fn label_key(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "invoice.status.draft",
            InvoiceStatus::Queued => "invoice.status.queued",
            InvoiceStatus::Sent => "invoice.status.sent",
            InvoiceStatus::Paid => "invoice.status.paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Queued => "queued",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
        };
        f.write_str(s)
    }
}

/// A saved invoice.
///
/// `total` is computed once at save time and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub client_name: String,
    pub items: Vec<InvoiceItem>,
    pub total: Money,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Chat
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry of the Co-Pilot transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// An in-app notification. Marked read on click, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    /// Tab to open when the notification is clicked.
    pub link: Option<Tab>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, link: Option<Tab>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            read: false,
            link,
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// The closed set of top-level views.
///
/// Unknown tags never fail to parse: they fall back to [`Tab::Dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Copilot,
    Invoice,
    Inventory,
    Network,
    Schemes,
    Loans,
    Profile,
}

impl Tab {
    /// Tabs in bottom-navigation order (Profile is reached from the header).
    pub const NAV: [Tab; 7] = [
        Tab::Dashboard,
        Tab::Copilot,
        Tab::Invoice,
        Tab::Inventory,
        Tab::Schemes,
        Tab::Loans,
        Tab::Network,
    ];

    /// The routing tag ("dashboard", "copilot", ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Copilot => "copilot",
            Tab::Invoice => "invoice",
            Tab::Inventory => "inventory",
            Tab::Network => "network",
            Tab::Schemes => "schemes",
            Tab::Loans => "loans",
            Tab::Profile => "profile",
        }
    }

    /// Translation key of the navigation label.
    pub fn nav_key(&self) -> &'static str {
        match self {
            Tab::Dashboard => "nav.home",
            Tab::Copilot => "nav.copilot",
            Tab::Invoice => "nav.invoice",
            Tab::Inventory => "nav.inventory",
            Tab::Network => "nav.network",
            Tab::Schemes => "nav.schemes",
            Tab::Loans => "nav.loans",
            Tab::Profile => "nav.profile",
        }
    }
}

impl FromStr for Tab {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "copilot" => Tab::Copilot,
            "invoice" => Tab::Invoice,
            "inventory" => Tab::Inventory,
            "network" => Tab::Network,
            "schemes" => Tab::Schemes,
            "loans" => Tab::Loans,
            "profile" => Tab::Profile,
            // "dashboard", "home" and anything unrecognised
            _ => Tab::Dashboard,
        })
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = InvoiceItem::new("Croissant", 3, Money::from_paise(2400));
        assert_eq!(item.line_total().paise(), 7200);
        assert_eq!(InvoiceItem::blank().quantity, 1);
    }

    #[test]
    fn test_unknown_tab_falls_back_to_dashboard() {
        assert_eq!("schemes".parse::<Tab>().unwrap(), Tab::Schemes);
        assert_eq!("LOANS".parse::<Tab>().unwrap(), Tab::Loans);
        assert_eq!("settings".parse::<Tab>().unwrap(), Tab::Dashboard);
        assert_eq!("".parse::<Tab>().unwrap(), Tab::Dashboard);
        assert_eq!(Tab::default(), Tab::Dashboard);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Queued).unwrap();
        assert_eq!(json, "\"queued\"");
        assert_eq!(InvoiceStatus::Sent.to_string(), "sent");
    }

    #[test]
    fn test_starter_inventory() {
        let products = Product::starter_inventory();
        let skus: Vec<_> = products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["HSOAP-001", "SCAND-002", "ABRD-001"]);
        assert_eq!(products[1].price.paise(), 1250);
        assert_ne!(products[0].id, products[1].id);
    }

    #[test]
    fn test_invoice_record_shape() {
        let invoice = Invoice {
            id: "inv-1".to_string(),
            client_name: "Acme".to_string(),
            items: vec![InvoiceItem::new("Bread", 1, Money::from_paise(700))],
            total: Money::from_paise(700),
            status: InvoiceStatus::Draft,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["clientName"], "Acme");
        assert_eq!(value["total"], 700);
        assert_eq!(value["status"], "draft");
    }
}
