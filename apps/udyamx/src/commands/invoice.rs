//! # Invoice Commands
//!
//! Editing, saving and printing the invoice form, and driving it by voice.
//!
//! ## Form Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  add_item / edit_item   ┌──────────┐   save_draft         │
//! │  │  Fresh   │ ──────────────────────► │ Editing  │ ───────────┐         │
//! │  │  form    │   set_client_name       │          │            │         │
//! │  └──────────┘   start_voice (fills)   └────┬─────┘            ▼         │
//! │       ▲                                    │           ┌────────────┐   │
//! │       │                                    │ print     │ Invoice    │   │
//! │       │                                    ▼           │ (draft) in │   │
//! │       │                             prints/*.html      │ the store  │   │
//! │       └──────────── reset ◄────────────────────────────┴────────────┘   │
//! │                                                                         │
//! │  A failed validation raises an alert and leaves everything unchanged.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use udyamx_core::print::render_invoice;
use udyamx_core::{Invoice, InvoiceItem, Money};

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

/// The form as shown: rows plus the live total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub client_name: String,
    pub items: Vec<InvoiceItem>,
    pub total: Money,
}

/// One editable cell of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemField {
    Description(String),
    Quantity(i64),
    Price(Money),
}

pub fn get_draft(ctx: &AppContext) -> DraftView {
    ctx.invoice.with_draft(|d| DraftView {
        client_name: d.client_name().to_string(),
        items: d.items().to_vec(),
        total: d.total(),
    })
}

pub fn set_client_name(ctx: &AppContext, name: &str) -> DraftView {
    ctx.invoice.with_draft_mut(|d| d.set_client_name(name));
    get_draft(ctx)
}

/// Appends a blank row (quantity 1, price 0).
pub fn add_item(ctx: &AppContext) -> ApiResult<DraftView> {
    debug!("add_item command");
    ctx.invoice.with_draft_mut(|d| d.add_row())?;
    Ok(get_draft(ctx))
}

/// Edits one cell of row `index` (0-based).
pub fn edit_item(ctx: &AppContext, index: usize, field: ItemField) -> ApiResult<DraftView> {
    debug!(index, ?field, "edit_item command");
    ctx.invoice.with_draft_mut(|d| match field {
        ItemField::Description(text) => d.edit_description(index, text),
        ItemField::Quantity(quantity) => d.edit_quantity(index, quantity),
        ItemField::Price(price) => d.edit_price(index, price),
    })?;
    Ok(get_draft(ctx))
}

pub fn remove_item(ctx: &AppContext, index: usize) -> ApiResult<DraftView> {
    debug!(index, "remove_item command");
    ctx.invoice.with_draft_mut(|d| d.remove_row(index))?;
    Ok(get_draft(ctx))
}

/// Validates the form, stores it as a `draft` invoice and resets the form.
///
/// ## Behavior
/// - Invalid form: `invoice.alerts.draftValidation` alert, nothing changes
/// - Storage failure: the form is kept as it was
/// - Success: `invoice.alerts.draftSaved` alert, fresh form
pub async fn save_draft(ctx: &AppContext) -> ApiResult<Invoice> {
    debug!("save_draft command");

    let mut working = ctx.invoice.snapshot();
    let invoice = match working.save() {
        Ok(invoice) => invoice,
        Err(e) => {
            ctx.alerts.push(ctx.i18n.t("invoice.alerts.draftValidation"));
            return Err(e.into());
        }
    };

    ctx.db.invoices().insert(invoice.clone()).await?;
    ctx.invoice.with_draft_mut(|d| d.reset());
    ctx.alerts.push(ctx.i18n.t("invoice.alerts.draftSaved"));

    info!(invoice_id = %invoice.id, total = %invoice.total, items = invoice.items.len(), "Invoice saved");
    Ok(invoice)
}

/// Saved invoices, oldest first.
pub async fn list_invoices(ctx: &AppContext) -> ApiResult<Vec<Invoice>> {
    Ok(ctx.db.invoices().list().await?)
}

/// Writes the printable HTML document and returns its path.
///
/// Requires a client name and a description on every row; otherwise
/// raises `invoice.alerts.printValidation`.
pub async fn print_invoice(ctx: &AppContext) -> ApiResult<PathBuf> {
    debug!("print_invoice command");

    let draft = ctx.invoice.snapshot();
    if let Err(e) = draft.validate_for_print() {
        ctx.alerts.push(ctx.i18n.t("invoice.alerts.printValidation"));
        return Err(e.into());
    }

    let document = render_invoice(
        &ctx.config.business_details(),
        draft.client_name(),
        draft.items(),
        Utc::now(),
    );

    let dir = ctx.config.prints_dir();
    let path = dir.join(format!("invoice-{}.html", document.number));
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot create {}: {}", dir.display(), e)))?;
    tokio::fs::write(&path, document.html)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot write {}: {}", path.display(), e)))?;

    info!(number = %document.number, path = %path.display(), "Invoice printed");
    Ok(path)
}

/// Starts hands-free entry. Clears the form first.
pub async fn start_voice(ctx: &AppContext) -> ApiResult<()> {
    ctx.voice.start().await
}

pub async fn stop_voice(ctx: &AppContext) -> ApiResult<()> {
    ctx.voice.stop().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support;
    use udyamx_core::InvoiceStatus;

    #[tokio::test]
    async fn test_save_freezes_total_and_resets_form() {
        let ctx = test_support::context().await;
        set_client_name(&ctx, "Local Coffee Shop");
        edit_item(&ctx, 0, ItemField::Description("Croissant".into())).unwrap();
        edit_item(&ctx, 0, ItemField::Quantity(2)).unwrap();
        edit_item(&ctx, 0, ItemField::Price(Money::from_paise(2400))).unwrap();
        add_item(&ctx).unwrap();
        edit_item(&ctx, 1, ItemField::Description("Sourdough".into())).unwrap();
        edit_item(&ctx, 1, ItemField::Quantity(5)).unwrap();
        let view = edit_item(&ctx, 1, ItemField::Price(Money::from_paise(750))).unwrap();
        assert_eq!(view.total.paise(), 8550);

        let invoice = save_draft(&ctx).await.unwrap();
        assert_eq!(invoice.total.paise(), 8550);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(ctx.alerts.drain(), vec!["invoice.alerts.draftSaved"]);

        let fresh = get_draft(&ctx);
        assert_eq!(fresh.client_name, "");
        assert_eq!(fresh.items, vec![InvoiceItem::blank()]);
        assert_eq!(list_invoices(&ctx).await.unwrap(), vec![invoice]);
    }

    #[tokio::test]
    async fn test_invalid_save_changes_nothing() {
        let ctx = test_support::context().await;
        edit_item(&ctx, 0, ItemField::Description("Bread".into())).unwrap();

        let err = save_draft(&ctx).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(ctx.alerts.drain(), vec!["invoice.alerts.draftValidation"]);
        assert_eq!(get_draft(&ctx).items[0].description, "Bread");
        assert!(list_invoices(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_not_found() {
        let ctx = test_support::context().await;
        let err = remove_item(&ctx, 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(remove_item(&ctx, 0).unwrap().items.len(), 0);
    }

    #[tokio::test]
    async fn test_print_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = crate::state::AppConfig::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        let ctx = test_support::context_with(config, udyamx_core::i18n::Translations::empty()).await;

        assert!(print_invoice(&ctx).await.is_err());
        assert_eq!(ctx.alerts.drain(), vec!["invoice.alerts.printValidation"]);

        set_client_name(&ctx, "<Acme>");
        edit_item(&ctx, 0, ItemField::Description("Bread".into())).unwrap();
        let path = print_invoice(&ctx).await.unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(path.starts_with(dir.path().join("prints")));
        assert!(html.contains("&lt;Acme&gt;"));
        assert!(html.contains("window.print()"));
    }

    #[tokio::test]
    async fn test_voice_without_speech_is_unsupported() {
        let ctx = test_support::context().await;
        let err = start_voice(&ctx).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unsupported);
        stop_voice(&ctx).await.unwrap();
    }
}
