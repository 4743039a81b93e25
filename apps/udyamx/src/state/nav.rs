//! Which view is on screen, plus the view-local selections that survive
//! switching away and back.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use udyamx_core::dashboard::SalesPeriod;
use udyamx_core::Tab;

#[derive(Debug, Default)]
struct Inner {
    tab: Tab,
    sales_period: SalesPeriod,
    network_query: String,
}

#[derive(Debug, Clone, Default)]
pub struct NavState {
    inner: Arc<Mutex<Inner>>,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Inner) -> R,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut inner)
    }

    pub fn tab(&self) -> Tab {
        self.with_inner(|inner| inner.tab)
    }

    pub fn set_tab(&self, tab: Tab) {
        debug!(%tab, "Switching tab");
        self.with_inner(|inner| inner.tab = tab);
    }

    pub fn sales_period(&self) -> SalesPeriod {
        self.with_inner(|inner| inner.sales_period)
    }

    pub fn set_sales_period(&self, period: SalesPeriod) {
        self.with_inner(|inner| inner.sales_period = period);
    }

    pub fn network_query(&self) -> String {
        self.with_inner(|inner| inner.network_query.clone())
    }

    pub fn set_network_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.with_inner(|inner| inner.network_query = query);
    }
}
