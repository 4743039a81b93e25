//! Language switching.

use tracing::info;
use udyamx_core::i18n::Locale;
use udyamx_core::LOCALE_STORAGE_KEY;

use crate::error::ApiResult;
use crate::state::AppContext;

/// Switches every view to `code` (`en`, `hi` or `mr`) and remembers it.
pub async fn set_locale(ctx: &AppContext, code: &str) -> ApiResult<Locale> {
    let locale = code.parse::<Locale>()?;
    ctx.i18n.set_locale(locale);
    ctx.db.storage().write(LOCALE_STORAGE_KEY, &locale).await?;

    info!(%locale, "Language changed");
    Ok(locale)
}
