//! Dashboard and directory lookups.

use udyamx_core::dashboard::{sales_bars, Bar, SalesPeriod};
use udyamx_core::directory::{search_businesses, Business};

use crate::error::ApiResult;
use crate::state::AppContext;

/// Selects the sales chart period and returns its bars.
pub fn set_sales_period(ctx: &AppContext, period: &str) -> ApiResult<Vec<Bar>> {
    let period = period.parse::<SalesPeriod>()?;
    ctx.nav.set_sales_period(period);
    Ok(sales_bars(period))
}

/// Filters the network directory and remembers the query.
pub fn search_network(ctx: &AppContext, query: &str) -> ApiResult<Vec<&'static Business>> {
    let results = search_businesses(query)?;
    ctx.nav.set_network_query(query.trim());
    Ok(results)
}
