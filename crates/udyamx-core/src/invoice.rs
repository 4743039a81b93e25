//! # Invoice Draft
//!
//! The editable invoice form: a client name plus an ordered list of rows.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Draft Operations                             │
//! │                                                                         │
//! │  User / Voice Action      Draft Method           Change                 │
//! │  ───────────────────      ────────────           ──────                 │
//! │                                                                         │
//! │  "Add item" ────────────► add_row() ───────────► items.push(blank)      │
//! │                                                                         │
//! │  Edit a cell ───────────► edit_*(i, v) ────────► items[i].field = v     │
//! │                                                                         │
//! │  Click remove ──────────► remove_row(i) ───────► items.remove(i)        │
//! │                                                                         │
//! │  Voice start ───────────► clear_for_voice() ───► client = "", items=[]  │
//! │                                                                         │
//! │  Save ──────────────────► save() ──────────────► validate, freeze total,│
//! │                                                  reset the form         │
//! │                                                                         │
//! │  NOTE: Failed validation never mutates the draft.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Invoice, InvoiceItem, InvoiceStatus};
use crate::validation::{validate_price, validate_price_ceiling, validate_quantity, validate_required_text};
use crate::{MAX_INVOICE_ITEMS, MAX_ITEM_QUANTITY};

/// The invoice currently being edited.
///
/// ## Invariants
/// - `total()` is always Σ quantity × price over the current rows
/// - At most [`MAX_INVOICE_ITEMS`] rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    client_name: String,
    items: Vec<InvoiceItem>,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceDraft {
    /// A fresh form: no client, one blank row.
    pub fn new() -> Self {
        InvoiceDraft {
            client_name: String::new(),
            items: vec![InvoiceItem::blank()],
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.client_name = name.into();
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    /// Direct access for action reconciliation (see [`crate::actions`]).
    pub fn items_mut(&mut self) -> &mut Vec<InvoiceItem> {
        &mut self.items
    }

    /// Appends a blank row.
    pub fn add_row(&mut self) -> CoreResult<()> {
        if self.items.len() >= MAX_INVOICE_ITEMS {
            return Err(CoreError::InvoiceTooLarge {
                max: MAX_INVOICE_ITEMS,
            });
        }
        self.items.push(InvoiceItem::blank());
        Ok(())
    }

    pub fn edit_description(&mut self, index: usize, description: impl Into<String>) -> CoreResult<()> {
        self.row_mut(index)?.description = description.into();
        Ok(())
    }

    /// Sets a row quantity. Range is checked on save, not while typing.
    /// Zero is accepted while editing; saving requires at least 1.
    pub fn edit_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        if !(0..=MAX_ITEM_QUANTITY).contains(&quantity) {
            return Err(relabel(
                ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 0,
                    max: MAX_ITEM_QUANTITY,
                },
                index,
            )
            .into());
        }
        self.row_mut(index)?.quantity = quantity;
        Ok(())
    }

    /// Negative prices are caught on save; oversized ones right away.
    pub fn edit_price(&mut self, index: usize, price: Money) -> CoreResult<()> {
        validate_price_ceiling(price).map_err(|e| relabel(e, index))?;
        self.row_mut(index)?.price = price;
        Ok(())
    }

    /// Removes a row and returns it.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<InvoiceItem> {
        if index >= self.items.len() {
            return Err(CoreError::ItemIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Live total of the current rows.
    pub fn total(&self) -> Money {
        self.items.iter().map(InvoiceItem::line_total).sum()
    }

    /// Back to a fresh form.
    pub fn reset(&mut self) {
        *self = InvoiceDraft::new();
    }

    /// Empties client and rows at the start of a voice session.
    pub fn clear_for_voice(&mut self) {
        self.client_name.clear();
        self.items.clear();
    }

    /// Checks everything a saved invoice needs.
    ///
    /// ## Rules
    /// - Client name is required
    /// - Every row has a description, quantity > 0 and price ≥ 0
    pub fn validate_for_save(&self) -> Result<(), ValidationError> {
        validate_required_text("client name", &self.client_name)?;

        for (i, item) in self.items.iter().enumerate() {
            validate_required_text(&format!("item {} description", i + 1), &item.description)?;
            validate_quantity(item.quantity).map_err(|e| relabel(e, i))?;
            validate_price(item.price).map_err(|e| relabel(e, i))?;
        }

        Ok(())
    }

    /// Printing only needs a client and a description on every row.
    pub fn validate_for_print(&self) -> Result<(), ValidationError> {
        validate_required_text("client name", &self.client_name)?;

        for (i, item) in self.items.iter().enumerate() {
            validate_required_text(&format!("item {} description", i + 1), &item.description)?;
        }

        Ok(())
    }

    /// Validates, produces a `draft` [`Invoice`] with the total frozen,
    /// and resets the form.
    ///
    /// On a validation failure nothing changes.
    ///
    /// ## Example
    /// ```rust
    /// use udyamx_core::invoice::InvoiceDraft;
    /// use udyamx_core::{InvoiceStatus, Money};
    ///
    /// let mut draft = InvoiceDraft::new();
    /// assert!(draft.save().is_err());
    ///
    /// draft.set_client_name("Acme");
    /// draft.edit_description(0, "Bread").unwrap();
    /// draft.edit_price(0, Money::from_paise(700)).unwrap();
    ///
    /// let invoice = draft.save().unwrap();
    /// assert_eq!(invoice.status, InvoiceStatus::Draft);
    /// assert_eq!(invoice.total.paise(), 700);
    /// assert_eq!(draft.client_name(), "");
    /// ```
    pub fn save(&mut self) -> CoreResult<Invoice> {
        self.validate_for_save()?;

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            client_name: self.client_name.trim().to_string(),
            items: self.items.clone(),
            total: self.total(),
            status: InvoiceStatus::Draft,
            created_at: Utc::now(),
        };

        self.reset();
        Ok(invoice)
    }

    fn row_mut(&mut self, index: usize) -> CoreResult<&mut InvoiceItem> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CoreError::ItemIndexOutOfRange { index, len })
    }
}

/// Prefixes a row validation error with its 1-based row number.
fn relabel(err: ValidationError, index: usize) -> ValidationError {
    let prefix = |field: String| format!("item {} {}", index + 1, field);
    match err {
        ValidationError::MustBePositive { field } => ValidationError::MustBePositive {
            field: prefix(field),
        },
        ValidationError::MustNotBeNegative { field } => ValidationError::MustNotBeNegative {
            field: prefix(field),
        },
        ValidationError::OutOfRange { field, min, max } => ValidationError::OutOfRange {
            field: prefix(field),
            min,
            max,
        },
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.set_client_name("Acme Bakery");
        draft.edit_description(0, "Croissant").unwrap();
        draft.edit_quantity(0, 2).unwrap();
        draft.edit_price(0, Money::from_paise(2400)).unwrap();
        draft.add_row().unwrap();
        draft.edit_description(1, "Loaf").unwrap();
        draft.edit_quantity(1, 5).unwrap();
        draft.edit_price(1, Money::from_paise(750)).unwrap();
        draft
    }

    #[test]
    fn test_new_draft_has_one_blank_row() {
        let draft = InvoiceDraft::new();
        assert_eq!(draft.items(), &[InvoiceItem::blank()]);
        assert!(draft.total().is_zero());
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let draft = filled();
        assert_eq!(draft.total().paise(), 8550);
    }

    #[test]
    fn test_save_freezes_total_and_resets() {
        let mut draft = filled();
        let invoice = draft.save().unwrap();

        assert_eq!(invoice.client_name, "Acme Bakery");
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.total.paise(), 8550);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(draft, InvoiceDraft::new());
    }

    #[test]
    fn test_save_without_client_does_not_mutate() {
        let mut draft = filled();
        draft.set_client_name("  ");
        let before = draft.clone();

        let err = draft.save().unwrap_err();
        assert!(err.to_string().contains("client name is required"));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_save_rejects_bad_rows() {
        let mut draft = filled();
        draft.edit_quantity(1, 0).unwrap();
        let err = draft.save().unwrap_err();
        assert!(err.to_string().contains("item 2 quantity"));

        let mut draft = filled();
        draft.edit_price(0, Money::from_paise(-100)).unwrap();
        assert!(draft.save().is_err());

        let mut draft = filled();
        draft.edit_description(1, "").unwrap();
        assert!(draft.save().is_err());
    }

    #[test]
    fn test_print_validation_is_looser() {
        let mut draft = filled();
        draft.edit_quantity(0, 0).unwrap();
        assert!(draft.validate_for_print().is_ok());
        assert!(draft.validate_for_save().is_err());

        draft.set_client_name("");
        assert!(draft.validate_for_print().is_err());
    }

    #[test]
    fn test_oversized_edits_are_rejected() {
        let mut draft = filled();
        let before = draft.clone();

        let huge = Money::parse_decimal("92233720368547758.07").unwrap();
        let err = draft.edit_price(0, huge).unwrap_err();
        assert!(err.to_string().contains("item 1 price"));
        assert!(draft.edit_quantity(0, MAX_ITEM_QUANTITY + 1).is_err());
        assert!(draft.edit_quantity(0, -1).is_err());

        assert_eq!(draft, before);
        assert_eq!(draft.total().paise(), 8550);
    }

    #[test]
    fn test_row_index_out_of_range() {
        let mut draft = InvoiceDraft::new();
        assert!(matches!(
            draft.remove_row(3),
            Err(CoreError::ItemIndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(draft.edit_price(1, Money::zero()).is_err());
        assert_eq!(draft.remove_row(0).unwrap(), InvoiceItem::blank());
        assert!(draft.items().is_empty());
    }

    #[test]
    fn test_row_limit() {
        let mut draft = InvoiceDraft::new();
        for _ in 1..MAX_INVOICE_ITEMS {
            draft.add_row().unwrap();
        }
        assert!(matches!(draft.add_row(), Err(CoreError::InvoiceTooLarge { .. })));
    }

    #[test]
    fn test_clear_for_voice() {
        let mut draft = filled();
        draft.clear_for_voice();
        assert_eq!(draft.client_name(), "");
        assert!(draft.items().is_empty());
    }
}
