//! Login against the store API.

use loomworks_core::LoginResponse;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::session::Session;

impl ApiClient {
    /// Authenticate and persist the resulting session.
    ///
    /// The login endpoint is the one call that returns its payload bare
    /// rather than wrapped in the `{ success, data }` envelope, and it must
    /// not go through the 401 handling: a wrong password is a form error,
    /// not a reason to drop whatever session is stored.
    ///
    /// The admin flag is checked before anything is persisted, so a
    /// non-admin login leaves no session behind.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AccessDenied`] for a non-admin account,
    /// [`ApiError::Validation`] or [`ApiError::Server`] carrying the
    /// upstream message (or `Login failed`) for a rejected login.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, ApiError> {
        let response = self
            .inner
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .and_then(Value::as_str)
                        .map(ToString::to_string)
                })
                .unwrap_or_else(|| "Login failed".to_string());
            return Err(if status.is_client_error() {
                ApiError::Validation(message)
            } else {
                ApiError::Server(message)
            });
        }

        let login: LoginResponse = serde_json::from_str(&body)?;

        if !login.user.is_admin {
            tracing::warn!(email, "Login rejected: account is not an admin");
            return Err(ApiError::AccessDenied);
        }

        let session = Session::new(login.token, login.user);
        self.inner.session.set(session.clone()).await?;

        tracing::info!(email, "Admin logged in");
        Ok(session)
    }
}
