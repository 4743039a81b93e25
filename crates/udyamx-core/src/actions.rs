//! # Invoice Actions
//!
//! The structured result of extracting item edits from spoken text, and
//! the rules for applying it to an invoice's rows.
//!
//! ## Wire Shape
//! ```text
//! {
//!   "add":    [{ "description": "Candle", "quantity": 2, "price": 0 }],
//!   "remove": [{ "description": "Soap" }],
//!   "update": [{ "description": "Bread", "quantity": 5 }]
//! }
//! ```
//! Every key is optional. A missing key means "no actions of that kind".
//!
//! ## Application Order
//! ```text
//! ┌──────────┐      ┌──────────┐      ┌──────────┐
//! │  remove  │ ───► │  update  │ ───► │   add    │
//! └──────────┘      └──────────┘      └──────────┘
//!  targets rows      targets rows      appends rows, price
//!  that existed      that existed      from the catalog
//!  before the turn   before the turn   (unmatched → 0)
//! ```
//! Rows added in a turn can never be hit by a same-turn remove or update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::inventory::PriceCatalog;
use crate::money::Money;
use crate::types::InvoiceItem;
use crate::{MAX_INVOICE_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Action Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddAction {
    pub description: String,
    pub quantity: i64,
    /// Always zero as extracted; the real price comes from the catalog.
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAction {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAction {
    pub description: String,
    pub quantity: i64,
}

/// Zero or more item edits extracted from one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<AddAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<Vec<RemoveAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Vec<UpdateAction>>,
}

impl InvoiceActions {
    /// True when no key carries an action.
    pub fn is_empty(&self) -> bool {
        self.add.as_ref().map_or(true, Vec::is_empty)
            && self.remove.as_ref().map_or(true, Vec::is_empty)
            && self.update.as_ref().map_or(true, Vec::is_empty)
    }

    /// Builds actions from an untrusted JSON value.
    ///
    /// ## Rules
    /// - Anything that is not an object yields the empty set
    /// - Entries without a non-blank string `description` are dropped
    /// - `add.quantity` missing or below 1 becomes 1; `add.price` is forced to 0
    /// - `update` entries without a quantity ≥ 1 are dropped
    /// - `add` and `update` entries above [`MAX_ITEM_QUANTITY`] are dropped
    /// - A key whose value is not an array is treated as absent
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return InvoiceActions::default();
        };

        let entries = |key: &str| obj.get(key).and_then(Value::as_array);

        let add = entries("add").map(|list| {
            list.iter()
                .filter_map(|entry| {
                    let description = description_of(entry)?;
                    let quantity = entry.get("quantity").and_then(quantity_of).unwrap_or(1).max(1);
                    if quantity > MAX_ITEM_QUANTITY {
                        return None;
                    }
                    Some(AddAction {
                        description,
                        quantity,
                        price: Money::zero(),
                    })
                })
                .collect()
        });

        let remove = entries("remove").map(|list| {
            list.iter()
                .filter_map(|entry| Some(RemoveAction { description: description_of(entry)? }))
                .collect()
        });

        let update = entries("update").map(|list| {
            list.iter()
                .filter_map(|entry| {
                    let description = description_of(entry)?;
                    let quantity = entry.get("quantity").and_then(quantity_of)?;
                    quantity_in_range(quantity).then_some(UpdateAction { description, quantity })
                })
                .collect()
        });

        InvoiceActions { add, remove, update }
    }

    /// Parses a raw model response body. Markdown code fences are stripped;
    /// anything unparseable yields the empty set.
    ///
    /// ## Example
    /// ```rust
    /// use udyamx_core::actions::InvoiceActions;
    ///
    /// let parsed = InvoiceActions::from_response_text(
    ///     "```json\n{\"remove\":[{\"description\":\"Soap\"}]}\n```",
    /// );
    /// assert_eq!(parsed.remove.unwrap()[0].description, "Soap");
    ///
    /// assert!(InvoiceActions::from_response_text("sorry, no idea").is_empty());
    /// ```
    pub fn from_response_text(text: &str) -> Self {
        let body = strip_code_fence(text);
        match serde_json::from_str::<Value>(body) {
            Ok(value) => InvoiceActions::from_value(&value),
            Err(_) => InvoiceActions::default(),
        }
    }
}

fn description_of(entry: &Value) -> Option<String> {
    let description = entry.get("description")?.as_str()?.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Accepts integers, floats (rounded) and numeric strings.
fn quantity_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn quantity_in_range(quantity: i64) -> bool {
    (1..=MAX_ITEM_QUANTITY).contains(&quantity)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// =============================================================================
// Application
// =============================================================================

/// How many rows each kind of action actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedSummary {
    pub removed: usize,
    pub updated: usize,
    pub added: usize,
}

impl AppliedSummary {
    /// True when at least one row changed.
    pub fn any(&self) -> bool {
        self.removed + self.updated + self.added > 0
    }
}

fn same_description(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Applies `actions` to `items` in remove → update → add order.
///
/// Only effective changes count as applied: removing a description that is
/// not on the invoice, or updating a row to the quantity it already has,
/// changes nothing. Actions whose quantity is outside 1..=[`MAX_ITEM_QUANTITY`]
/// are skipped.
///
/// ## Example
/// ```rust
/// use udyamx_core::actions::{apply, AddAction, InvoiceActions, RemoveAction};
/// use udyamx_core::{InvoiceItem, Money, Product};
///
/// let catalog = Product::starter_inventory();
/// let mut items = vec![InvoiceItem::new("Soap", 2, Money::from_paise(500))];
/// let actions = InvoiceActions {
///     remove: Some(vec![RemoveAction { description: "Soap".into() }]),
///     add: Some(vec![AddAction { description: "Scented Candle".into(), quantity: 1, price: Money::zero() }]),
///     update: None,
/// };
///
/// let summary = apply(&mut items, &actions, catalog.as_slice());
/// assert!(summary.any());
/// assert_eq!(items, vec![InvoiceItem::new("Scented Candle", 1, Money::from_paise(1250))]);
/// ```
pub fn apply<C>(items: &mut Vec<InvoiceItem>, actions: &InvoiceActions, catalog: &C) -> AppliedSummary
where
    C: PriceCatalog + ?Sized,
{
    let mut summary = AppliedSummary::default();

    for action in actions.remove.iter().flatten() {
        let before = items.len();
        items.retain(|item| !same_description(&item.description, &action.description));
        summary.removed += before - items.len();
    }

    for action in actions.update.iter().flatten().filter(|a| quantity_in_range(a.quantity)) {
        for item in items.iter_mut() {
            if same_description(&item.description, &action.description) && item.quantity != action.quantity {
                item.quantity = action.quantity;
                summary.updated += 1;
            }
        }
    }

    for action in actions.add.iter().flatten().filter(|a| quantity_in_range(a.quantity)) {
        if items.len() >= MAX_INVOICE_ITEMS {
            break;
        }
        let price = catalog.unit_price(&action.description).unwrap_or_default();
        items.push(InvoiceItem::new(action.description.clone(), action.quantity, price));
        summary.added += 1;
    }

    summary
}

// =============================================================================
// Unit Tests
// =============================================================================
