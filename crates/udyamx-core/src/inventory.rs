//! # Inventory Rules
//!
//! Barcode resolution, manual product entry and catalog price lookup.
//!
//! ## Barcode Resolution Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     resolve_scan(code)                                  │
//! │                                                                         │
//! │   code matches an existing SKU? ──yes──► quantity + 1                   │
//! │            │ no                          (QuantityIncremented)          │
//! │            ▼                                                            │
//! │   code in reference catalog?   ──yes──► new product, quantity 1         │
//! │            │ no                          (AddedFromCatalog)             │
//! │            ▼                                                            │
//! │   manual entry, SKU pre-filled with the code                           │
//! │                                          (NeedsManualEntry)             │
//! │                                                                         │
//! │   Exactly one outcome for every input.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price, validate_quantity, validate_required_text, validate_sku};

// =============================================================================
// Reference Catalog
// =============================================================================

/// A product known by barcode before it is ever stocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub barcode: &'static str,
    pub name: &'static str,
    pub price: Money,
}

/// The static barcode catalog consulted when a scan matches no SKU.
pub const REFERENCE_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        barcode: "8901030724941",
        name: "Tata Salt (1kg)",
        price: Money::from_paise(2800),
    },
    CatalogEntry {
        barcode: "8901058853789",
        name: "Maggi Noodles (70g)",
        price: Money::from_paise(1400),
    },
    CatalogEntry {
        barcode: "8901233019827",
        name: "Parle-G Biscuit (56g)",
        price: Money::from_paise(500),
    },
];

/// Looks a barcode up in [`REFERENCE_CATALOG`].
pub fn catalog_lookup(code: &str) -> Option<&'static CatalogEntry> {
    REFERENCE_CATALOG.iter().find(|entry| entry.barcode == code)
}

// =============================================================================
// Scanning
// =============================================================================

/// What a scan did to the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScanOutcome {
    /// The code was an existing SKU; one more unit on hand.
    QuantityIncremented { name: String, quantity: i64 },
    /// The code was in the reference catalog; a new product was added.
    AddedFromCatalog { product: Product },
    /// Unknown code; the user must fill in the rest.
    NeedsManualEntry { sku: String },
}

/// Applies a scanned code to the inventory.
///
/// Total over every input: exactly one [`ScanOutcome`] is returned and the
/// inventory is only touched for the first two outcomes.
pub fn resolve_scan(products: &mut Vec<Product>, code: &str) -> ScanOutcome {
    let code = code.trim();

    if let Some(existing) = products.iter_mut().find(|p| p.sku == code) {
        existing.quantity += 1;
        return ScanOutcome::QuantityIncremented {
            name: existing.name.clone(),
            quantity: existing.quantity,
        };
    }

    if let Some(entry) = catalog_lookup(code) {
        let product = Product::new(entry.name, entry.barcode, 1, entry.price);
        products.push(product.clone());
        return ScanOutcome::AddedFromCatalog { product };
    }

    ScanOutcome::NeedsManualEntry {
        sku: code.to_string(),
    }
}

// =============================================================================
// Manual Entry
// =============================================================================

/// Fields of the "add product" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub name: String,
    /// Blank means "generate one".
    pub sku: Option<String>,
    pub quantity: i64,
    pub price: Money,
}

/// Validates a manual entry and appends it as a new product.
///
/// ## Rules
/// - Name required, quantity > 0, price ≥ 0
/// - A supplied SKU must be well-formed and not already used
/// - Without a SKU one is generated (`SKU-` + 9 uppercase alphanumerics)
pub fn add_manual(products: &mut Vec<Product>, entry: ManualEntry) -> Result<Product, ValidationError> {
    validate_required_text("name", &entry.name)?;
    validate_quantity(entry.quantity)?;
    validate_price(entry.price)?;

    let sku = match entry.sku.as_deref().map(str::trim) {
        Some(sku) if !sku.is_empty() => {
            validate_sku(sku)?;
            if products.iter().any(|p| p.sku == sku) {
                return Err(ValidationError::Duplicate {
                    field: "sku".to_string(),
                    value: sku.to_string(),
                });
            }
            sku.to_string()
        }
        _ => loop {
            let candidate = generate_sku();
            if !products.iter().any(|p| p.sku == candidate) {
                break candidate;
            }
        },
    };

    let product = Product::new(entry.name.trim(), sku, entry.quantity, entry.price);
    products.push(product.clone());
    Ok(product)
}

/// Generates `SKU-XXXXXXXXX` from the random bits of a v4 UUID.
pub fn generate_sku() -> String {
    const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut bits = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(13);
    out.push_str("SKU-");
    for _ in 0..9 {
        out.push(ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    out
}

// =============================================================================
// Price Lookup
// =============================================================================

/// Resolves a unit price for a spoken item description.
pub trait PriceCatalog {
    /// Case-insensitive exact match on the product name.
    fn unit_price(&self, description: &str) -> Option<Money>;
}

impl PriceCatalog for [Product] {
    fn unit_price(&self, description: &str) -> Option<Money> {
        let wanted = description.trim().to_lowercase();
        self.iter()
            .find(|p| p.name.to_lowercase() == wanted)
            .map(|p| p.price)
    }
}

impl PriceCatalog for Vec<Product> {
    fn unit_price(&self, description: &str) -> Option<Money> {
        self.as_slice().unit_price(description)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_existing_sku_increments() {
        let mut products = Product::starter_inventory();
        let outcome = resolve_scan(&mut products, "SCAND-002");

        assert_eq!(
            outcome,
            ScanOutcome::QuantityIncremented {
                name: "Scented Candle".to_string(),
                quantity: 61
            }
        );
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_scan_catalog_code_adds_product() {
        let mut products = Product::starter_inventory();
        let outcome = resolve_scan(&mut products, "8901030724941");

        match outcome {
            ScanOutcome::AddedFromCatalog { product } => {
                assert_eq!(product.name, "Tata Salt (1kg)");
                assert_eq!(product.quantity, 1);
                assert_eq!(product.price.paise(), 2800);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(products.len(), 4);

        // A second scan of the same code now hits the SKU branch
        let again = resolve_scan(&mut products, "8901030724941");
        assert!(matches!(again, ScanOutcome::QuantityIncremented { quantity: 2, .. }));
    }

    #[test]
    fn test_scan_unknown_code_needs_manual_entry() {
        let mut products = Product::starter_inventory();
        let before = products.clone();
        let outcome = resolve_scan(&mut products, "NEW-4821");

        assert_eq!(
            outcome,
            ScanOutcome::NeedsManualEntry {
                sku: "NEW-4821".to_string()
            }
        );
        assert_eq!(products, before);
    }

    #[test]
    fn test_add_manual_generates_sku() {
        let mut products = Vec::new();
        let product = add_manual(
            &mut products,
            ManualEntry {
                name: "Clay Pot".to_string(),
                sku: None,
                quantity: 4,
                price: Money::from_paise(15000),
            },
        )
        .unwrap();

        assert!(product.sku.starts_with("SKU-"));
        assert_eq!(product.sku.len(), 13);
        assert!(product.sku[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_add_manual_rejects_duplicate_and_invalid() {
        let mut products = Product::starter_inventory();

        let dup = add_manual(
            &mut products,
            ManualEntry {
                name: "Another Soap".to_string(),
                sku: Some("HSOAP-001".to_string()),
                quantity: 1,
                price: Money::zero(),
            },
        );
        assert!(matches!(dup, Err(ValidationError::Duplicate { .. })));

        let no_name = add_manual(
            &mut products,
            ManualEntry {
                quantity: 1,
                ..Default::default()
            },
        );
        assert!(no_name.is_err());

        let zero_qty = add_manual(
            &mut products,
            ManualEntry {
                name: "Jar".to_string(),
                quantity: 0,
                ..Default::default()
            },
        );
        assert!(zero_qty.is_err());
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_price_lookup_is_case_insensitive_exact() {
        let products = Product::starter_inventory();
        assert_eq!(products.unit_price("handmade soap"), Some(Money::from_paise(599)));
        assert_eq!(products.unit_price(" SCENTED CANDLE "), Some(Money::from_paise(1250)));
        assert_eq!(products.unit_price("soap"), None);
    }
}
