//! Dashboard statistics call.

use loomworks_core::DashboardStats;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch the aggregated storefront statistics shown on the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let builder = self.request(Method::GET, "/api/admin/dashboard").await;
        self.send(builder).await
    }
}
