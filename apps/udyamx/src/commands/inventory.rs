//! # Inventory Commands
//!
//! Stock list, manual entry and barcode scanning.
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  simulate_scan ── camera? ──no──► PERMISSION_DENIED + scanner alert     │
//! │       │ yes                                                             │
//! │       ▼  (scan delay)                                                   │
//! │  pick one of: catalog barcode │ existing SKU │ NEW-####                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  scan_barcode(code) ──► resolve_scan under the inventory lock           │
//! │       │                                                                 │
//! │       ├── existing SKU  ──► quantity + 1  ──► "quantityUpdated" alert   │
//! │       ├── catalog match ──► new product    ──► "itemAdded" alert        │
//! │       └── unknown       ──► NeedsManualEntry (form pre-filled with SKU) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};
use udyamx_core::inventory::{add_manual, resolve_scan, ManualEntry, ScanOutcome, REFERENCE_CATALOG};
use udyamx_core::Product;

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

pub async fn list_products(ctx: &AppContext) -> ApiResult<Vec<Product>> {
    Ok(ctx.db.products().list().await?)
}

/// Validates and appends a product typed in by hand.
///
/// Invalid input raises `inventory.modal.validation` and stores nothing.
pub async fn add_product(ctx: &AppContext, entry: ManualEntry) -> ApiResult<Product> {
    debug!(name = %entry.name, "add_product command");
    let added = ctx.db.products().modify(|products| add_manual(products, entry)).await?;
    let product = match added {
        Ok(product) => product,
        Err(e) => {
            ctx.alerts.push(ctx.i18n.t("inventory.modal.validation"));
            return Err(e.into());
        }
    };

    info!(sku = %product.sku, name = %product.name, "Product added");
    Ok(product)
}

/// Applies a scanned code to the inventory.
pub async fn scan_barcode(ctx: &AppContext, code: &str) -> ApiResult<ScanOutcome> {
    debug!(code, "scan_barcode command");

    let outcome = ctx.db.products().modify(|products| resolve_scan(products, code)).await?;

    match &outcome {
        ScanOutcome::QuantityIncremented { name, quantity } => {
            ctx.alerts.push(ctx.i18n.t_with(
                "inventory.alerts.quantityUpdated",
                &[("name", name), ("quantity", &quantity.to_string())],
            ));
        }
        ScanOutcome::AddedFromCatalog { product } => {
            ctx.alerts
                .push(ctx.i18n.t_with("inventory.alerts.itemAdded", &[("name", &product.name)]));
        }
        ScanOutcome::NeedsManualEntry { sku } => {
            debug!(%sku, "Unknown code, manual entry needed");
        }
    }

    info!(code, ?outcome, "Barcode resolved");
    Ok(outcome)
}

/// Runs the simulated camera scanner and applies whatever it "sees".
///
/// ## Errors
/// `PERMISSION_DENIED` when camera access is off; the scanner error alert
/// is raised and the inventory is untouched.
pub async fn simulate_scan(ctx: &AppContext) -> ApiResult<ScanOutcome> {
    if !ctx.config.scanner.camera {
        warn!("Camera unavailable, scanner disabled");
        ctx.alerts.push(format!(
            "{}: {}",
            ctx.i18n.t("inventory.scanner.errorTitle"),
            ctx.i18n.t("inventory.scanner.errorMessage")
        ));
        return Err(ApiError::permission_denied("Camera access was denied"));
    }

    tokio::time::sleep(Duration::from_millis(ctx.config.scanner.scan_delay_ms)).await;

    let code = pick_simulated_code();
    info!(%code, "{}", ctx.i18n.t("inventory.scanner.detected"));
    scan_barcode(ctx, &code).await
}

/// One of: a reference catalog barcode, a starter SKU, or an unknown `NEW-####`.
fn pick_simulated_code() -> String {
    let mut rng = rand::thread_rng();
    let candidates = [
        REFERENCE_CATALOG[0].barcode.to_string(),
        "SCAND-002".to_string(),
        format!("NEW-{}", rng.gen_range(1000..10000)),
    ];
    let index = rng.gen_range(0..candidates.len());
    candidates[index].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{test_support, AppConfig};
    use udyamx_core::i18n::{Locale, Translations};
    use udyamx_core::Money;

    fn english() -> Translations {
        Translations::from_tables([(
            Locale::En,
            serde_json::json!({"inventory": {"alerts": {
                "itemAdded": "{name} added",
                "quantityUpdated": "{name} now {quantity}"
            }}}),
        )])
    }

    #[tokio::test]
    async fn test_scan_resolution_outcomes() {
        let ctx = test_support::context_with(AppConfig::default(), english()).await;

        let outcome = scan_barcode(&ctx, "SCAND-002").await.unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::QuantityIncremented {
                name: "Scented Candle".into(),
                quantity: 61
            }
        );

        let outcome = scan_barcode(&ctx, "8901030724941").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::AddedFromCatalog { ref product } if product.quantity == 1));

        let outcome = scan_barcode(&ctx, "NEW-4242").await.unwrap();
        assert_eq!(outcome, ScanOutcome::NeedsManualEntry { sku: "NEW-4242".into() });

        assert_eq!(
            ctx.alerts.drain(),
            vec!["Scented Candle now 61", "Tata Salt (1kg) added"]
        );
        assert_eq!(list_products(&ctx).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_manual_entry_validation_and_duplicates() {
        let ctx = test_support::context().await;

        let invalid = ManualEntry {
            name: "Jaggery".into(),
            sku: None,
            quantity: 0,
            price: Money::from_paise(4000),
        };
        assert_eq!(add_product(&ctx, invalid).await.unwrap_err().code, ErrorCode::ValidationError);
        assert_eq!(ctx.alerts.drain(), vec!["inventory.modal.validation"]);

        let duplicate = ManualEntry {
            name: "Soap".into(),
            sku: Some("HSOAP-001".into()),
            quantity: 1,
            price: Money::zero(),
        };
        assert!(add_product(&ctx, duplicate).await.is_err());

        let product = add_product(
            &ctx,
            ManualEntry {
                name: "Jaggery".into(),
                sku: None,
                quantity: 3,
                price: Money::from_paise(4000),
            },
        )
        .await
        .unwrap();
        assert!(product.sku.starts_with("SKU-"));
        assert_eq!(list_products(&ctx).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_camera_denied_disables_scanning() {
        let mut config = AppConfig::default();
        config.scanner.camera = false;
        let ctx = test_support::context_with(config, Translations::empty()).await;

        let err = simulate_scan(&ctx).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(ctx.alerts.drain().len(), 1);
        assert_eq!(list_products(&ctx).await.unwrap().len(), 3);
    }

    #[test]
    fn test_simulated_codes_come_from_the_three_sources() {
        for _ in 0..50 {
            let code = pick_simulated_code();
            let ok = code == "8901030724941"
                || code == "SCAND-002"
                || (code.starts_with("NEW-") && code[4..].parse::<u32>().map_or(false, |n| (1000..10000).contains(&n)));
            assert!(ok, "unexpected code {}", code);
        }
    }
}
