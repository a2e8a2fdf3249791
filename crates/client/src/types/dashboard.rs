//! Admin dashboard types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::Price;

use super::order::Order;

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_products: u64,
    pub total_users: u64,
    pub total_sales: Price,
    pub recent_orders: Vec<Order>,
    pub top_products: Vec<TopProduct>,
}

/// A best-selling product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub price: Price,
    pub total_sold: u64,
}

/// One bucket of the sales chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesChartPoint {
    /// Axis label, e.g. "Mon" or "Jan".
    pub label: String,
    pub orders: u64,
    pub revenue: Decimal,
}

/// Daily and monthly sales series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesChart {
    pub daily: Vec<SalesChartPoint>,
    pub monthly: Vec<SalesChartPoint>,
}

impl SalesChart {
    /// The series for the requested granularity.
    #[must_use]
    pub fn series(&self, monthly: bool) -> &[SalesChartPoint] {
        if monthly { &self.monthly } else { &self.daily }
    }

    /// Revenue summed over a series.
    #[must_use]
    pub fn total_revenue(&self, monthly: bool) -> Decimal {
        self.series(monthly).iter().map(|p| p.revenue).sum()
    }
}
