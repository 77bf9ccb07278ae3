//! Product review moderation calls.

use loomworks_core::{Review, ReviewId};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Query parameters for the review listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ApiClient {
    /// List reviews across all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/admin/reviews")
            .await
            .query(query);
        self.send(builder).await
    }

    /// Publish a pending review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the review does not exist.
    #[instrument(skip(self))]
    pub async fn approve_review(&self, id: &ReviewId) -> Result<Review, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/api/admin/reviews/{id}/approve"))
            .await;
        self.send(builder).await
    }

    /// Unpublish an approved review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the review does not exist.
    #[instrument(skip(self))]
    pub async fn reject_review(&self, id: &ReviewId) -> Result<Review, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/api/admin/reviews/{id}/reject"))
            .await;
        self.send(builder).await
    }

    /// Delete a review outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_review(&self, id: &ReviewId) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, &format!("/api/admin/reviews/{id}"))
            .await;
        let _body: serde_json::Value = self.send(builder).await?;
        Ok(())
    }
}
