//! Customer account calls.

use loomworks_core::{Customer, CustomerId, CustomerInput};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Query parameters for the customer listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ApiClient {
    /// List customer accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn list_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/admin/customers")
            .await
            .query(query);
        self.send(builder).await
    }

    /// Fetch a single customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the customer does not exist.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: &CustomerId) -> Result<Customer, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/api/admin/customers/{id}"))
            .await;
        self.send(builder).await
    }

    /// Create a customer account. `input.password` must be set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the upstream rejects the
    /// input.
    #[instrument(skip(self, input))]
    pub async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, ApiError> {
        let builder = self
            .request(Method::POST, "/api/admin/customers")
            .await
            .json(input);
        self.send(builder).await
    }

    /// Update a customer's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the upstream rejects the
    /// input.
    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        id: &CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/api/admin/customers/{id}"))
            .await
            .json(input);
        self.send(builder).await
    }

    /// Activate or suspend a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the customer does not exist.
    #[instrument(skip(self))]
    pub async fn set_customer_active(
        &self,
        id: &CustomerId,
        is_active: bool,
    ) -> Result<Customer, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/api/admin/customers/{id}/status"))
            .await
            .json(&serde_json::json!({ "isActive": is_active }));
        self.send(builder).await
    }

    /// Delete a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: &CustomerId) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, &format!("/api/admin/customers/{id}"))
            .await;
        let _body: serde_json::Value = self.send(builder).await?;
        Ok(())
    }
}
