//! # Dashboard
//!
//! Figures behind the home tab: trust score, sales analytics series and
//! achievements. All values are fixed sample data.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Business trust score shown on the dashboard, out of 100.
pub const TRUST_SCORE: u8 = 78;

/// Sales analytics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl SalesPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesPeriod::Day => "day",
            SalesPeriod::Week => "week",
            SalesPeriod::Month => "month",
        }
    }

    /// Translation key of the insight sentence under the chart.
    pub fn insight_key(&self) -> String {
        format!("dashboard.salesAnalytics.insights_{}", self.as_str())
    }

    /// `(label, value)` pairs for the chart.
    pub fn series(&self) -> &'static [(&'static str, u32)] {
        match self {
            SalesPeriod::Day => &[
                ("M", 30),
                ("T", 50),
                ("W", 80),
                ("T", 60),
                ("F", 75),
                ("S", 55),
                ("S", 90),
            ],
            SalesPeriod::Week => &[("W1", 350), ("W2", 400), ("W3", 380), ("W4", 500)],
            SalesPeriod::Month => &[
                ("J", 1500),
                ("F", 1800),
                ("M", 1600),
                ("A", 2000),
                ("M", 1900),
                ("J", 2200),
            ],
        }
    }
}

impl FromStr for SalesPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(SalesPeriod::Day),
            "week" => Ok(SalesPeriod::Week),
            "month" => Ok(SalesPeriod::Month),
            other => Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: format!("'{}' is not one of day, week, month", other),
            }),
        }
    }
}

/// One chart bar: height in percent of the largest value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: &'static str,
    pub value: u32,
    pub height_percent: u32,
}

/// Bars for a period, scaled so the largest is 100%.
pub fn sales_bars(period: SalesPeriod) -> Vec<Bar> {
    let series = period.series();
    let max = series.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);

    series
        .iter()
        .map(|&(label, value)| Bar {
            label,
            value,
            height_percent: value * 100 / max,
        })
        .collect()
}

/// An achievement badge: `(translation key, completed)`.
pub const ACHIEVEMENTS: &[(&str, bool)] = &[
    ("dashboard.achievements.invoices", true),
    ("dashboard.achievements.products", true),
    ("dashboard.achievements.copilot", true),
    ("dashboard.achievements.network", false),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_are_relative_to_max() {
        let bars = sales_bars(SalesPeriod::Week);
        let heights: Vec<u32> = bars.iter().map(|b| b.height_percent).collect();
        assert_eq!(heights, vec![70, 80, 76, 100]);

        let day = sales_bars(SalesPeriod::Day);
        assert_eq!(day.len(), 7);
        assert_eq!(day[6].height_percent, 100);
    }

    #[test]
    fn test_period_parsing_and_keys() {
        assert_eq!("Month".parse::<SalesPeriod>().unwrap(), SalesPeriod::Month);
        assert!("year".parse::<SalesPeriod>().is_err());
        assert_eq!(SalesPeriod::Week.insight_key(), "dashboard.salesAnalytics.insights_week");
    }
}
