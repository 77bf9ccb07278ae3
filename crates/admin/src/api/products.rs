//! Product catalog calls.

use loomworks_core::{Product, ProductId, ProductInput};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Query parameters for the product listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ApiClient {
    /// List products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/admin/products")
            .await
            .query(query);
        self.send(builder).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/api/admin/products/{id}"))
            .await;
        self.send(builder).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the upstream rejects the
    /// input.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let builder = self
            .request(Method::POST, "/api/admin/products")
            .await
            .json(input);
        self.send(builder).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the upstream rejects the
    /// input.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/api/admin/products/{id}"))
            .await
            .json(input);
        self.send(builder).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, &format!("/api/admin/products/{id}"))
            .await;
        let _body: serde_json::Value = self.send(builder).await?;
        Ok(())
    }
}
