//! Admin dashboard figures.

use tracing::instrument;

use crate::client::ApiClient;
use crate::conversions::{
    WireDashboardStats, WireSalesChart, convert_dashboard_stats, convert_sales_chart,
};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{DashboardStats, SalesChart};

impl ApiClient {
    /// Totals, recent orders and best sellers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.fetch_one::<WireDashboardStats, _>(
            ApiRequest::get("/api/dashboard/stats"),
            convert_dashboard_stats,
        )
        .await
    }

    /// Daily and monthly order and revenue series.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sales_chart(&self) -> Result<SalesChart, ApiError> {
        self.fetch_one::<WireSalesChart, _>(
            ApiRequest::get("/api/dashboard/sales-chart"),
            convert_sales_chart,
        )
        .await
    }
}
