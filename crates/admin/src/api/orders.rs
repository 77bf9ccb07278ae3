//! Order calls.

use loomworks_core::{Order, OrderId, OrderStatus};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Query parameters for the order listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl ApiClient {
    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<Order>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/admin/orders")
            .await
            .query(query);
        self.send(builder).await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/api/admin/orders/{id}"))
            .await;
        self.send(builder).await
    }

    /// Move an order to a new fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/api/admin/orders/{id}/status"))
            .await
            .json(&serde_json::json!({ "status": status }));
        self.send(builder).await
    }
}
