//! Authenticated client for the store API.
//!
//! Every admin page talks to the upstream store API through [`ApiClient`].
//! The client owns the cross-cutting request behavior so the per-resource
//! wrappers stay declarative:
//!
//! - attaches the session bearer token when one is stored,
//! - on a 401 clears the persisted session before surfacing
//!   [`ApiError::Unauthorized`], so a stale token forces exactly one logout,
//! - unwraps the `{ success, data }` response envelope,
//! - maps non-2xx responses to [`ApiError::Validation`] (4xx) or
//!   [`ApiError::Server`] (5xx) carrying the upstream `message`.
//!
//! Resource wrappers live in sibling modules as `impl ApiClient` blocks.

mod auth;
mod customers;
mod dashboard;
mod error;
mod orders;
mod products;
mod reviews;

pub use customers::CustomerQuery;
pub use error::ApiError;
pub use orders::OrderQuery;
pub use products::ProductQuery;
pub use reviews::ReviewQuery;

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::session::SessionStore;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the store API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// The session store this client reads tokens from and clears on 401.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Start a request with the stored bearer token attached, when present.
    pub(crate) async fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.inner.http.request(method, self.url(path));
        if let Some(token) = self.inner.session.token().await {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a prepared request and decode the enveloped response.
    pub(crate) async fn send<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Clearing an already-cleared session is a no-op, so concurrent
            // 401s cause a single forced logout.
            if let Err(e) = self.inner.session.clear().await {
                tracing::warn!(error = %e, "Failed to clear session after 401");
            }
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(serde_json::from_value(unwrap_envelope(value))?)
    }
}

/// Pull the payload out of the `{ success, data }` envelope.
///
/// A missing or `null` `data` field yields the body as-is, which is what
/// message-only responses (deletes, status changes) look like.
fn unwrap_envelope(mut value: Value) -> Value {
    match value.get_mut("data") {
        Some(data) if !data.is_null() => data.take(),
        _ => value,
    }
}

/// Classify a non-2xx response, preferring the upstream `message` field.
fn error_from_response(status: reqwest::StatusCode, body: &str) -> ApiError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string),
        Err(_) => "Request failed".to_string(),
    };

    if status.is_client_error() {
        ApiError::Validation(message)
    } else {
        ApiError::Server(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use loomworks_core::{AdminUser, Product};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::session::{Session, SessionStore, StoredSession};

    fn temp_session_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "loomworks-api-test-{}-{name}.json",
            std::process::id()
        ))
    }

    async fn active_store(name: &str) -> SessionStore {
        let store = SessionStore::load(temp_session_path(name));
        store
            .set(Session::new(
                "test-token".to_string(),
                AdminUser {
                    id: None,
                    name: None,
                    email: "admin@loomworks.shop".to_string(),
                    is_admin: true,
                },
            ))
            .await
            .expect("seed session");
        store
    }

    fn product_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "prod-1",
            "title": "Jute Tote",
            "price": 499.0,
            "category": "Bags",
            "stock": 12
        })
    }

    #[tokio::test]
    async fn test_attaches_bearer_token_from_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/products/prod-1"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": product_json()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = active_store("bearer").await;
        let client = ApiClient::new(server.uri(), store.clone()).expect("client");
        let product = client
            .get_product(&"prod-1".into())
            .await
            .expect("get product");
        assert_eq!(product.title, "Jute Tote");

        store.clear().await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_omits_auth_header_without_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/products/prod-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": product_json()
            })))
            .mount(&server)
            .await;

        let store = SessionStore::load(temp_session_path("no-auth"));
        let client = ApiClient::new(server.uri(), store).expect("client");
        client
            .get_product(&"prod-1".into())
            .await
            .expect("get product");

        let requests = server.received_requests().await.expect("requests");
        assert!(
            requests
                .iter()
                .all(|r| !r.headers.contains_key("authorization"))
        );
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/products/prod-1"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid token"
            })))
            .mount(&server)
            .await;

        let store = active_store("clears").await;
        let client = ApiClient::new(server.uri(), store.clone()).expect("client");

        let err = client.get_product(&"prod-1".into()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(store.get().await, StoredSession::Missing);

        // A second 401 is still Unauthorized; clearing twice is harmless.
        let err = client.get_product(&"prod-1".into()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(store.get().await, StoredSession::Missing);
    }

    #[tokio::test]
    async fn test_unwraps_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [product_json()],
                "total": 1
            })))
            .mount(&server)
            .await;

        let store = active_store("envelope").await;
        let client = ApiClient::new(server.uri(), store.clone()).expect("client");
        let products: Vec<Product> = client
            .list_products(&ProductQuery::default())
            .await
            .expect("list");
        assert_eq!(products.len(), 1);

        store.clear().await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_get_order_decodes_wire_aliases() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/orders/ord-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "_id": "ord-1",
                    "orderItems": [{"title": "Jute Tote", "price": 499.0, "quantity": 2}],
                    "customerDetails": {"fullName": "Asha Rao", "email": "asha@example.com"},
                    "totalAmount": 998.0,
                    "status": "Processing"
                }
            })))
            .mount(&server)
            .await;

        let store = active_store("get-order").await;
        let client = ApiClient::new(server.uri(), store.clone()).expect("client");
        let order = client.get_order(&"ord-1".into()).await.expect("get order");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.status, loomworks_core::OrderStatus::Processing);

        store.clear().await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_null_data_falls_back_to_raw_body() {
        let raw = serde_json::json!({ "success": true, "data": null, "message": "Deleted" });
        let unwrapped = unwrap_envelope(raw.clone());
        assert_eq!(unwrapped, raw);

        let enveloped = serde_json::json!({ "success": true, "data": { "x": 1 } });
        assert_eq!(unwrap_envelope(enveloped), serde_json::json!({ "x": 1 }));
    }

    #[tokio::test]
    async fn test_client_error_carries_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/products"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Title is required"
            })))
            .mount(&server)
            .await;

        let store = active_store("message").await;
        let client = ApiClient::new(server.uri(), store.clone()).expect("client");
        let input = loomworks_core::ProductInput {
            title: String::new(),
            description: String::new(),
            price: rust_decimal::Decimal::ZERO,
            category: "Bags".to_string(),
            stock: 0,
            images: vec![],
        };

        let err = client.create_product(&input).await.unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, "Title is required"),
            other => panic!("expected validation error, got {other:?}"),
        }

        store.clear().await.expect("cleanup");
    }

    #[test]
    fn test_error_fallback_messages() {
        let status = reqwest::StatusCode::INTERNAL_SERVER_ERROR;
        match error_from_response(status, r#"{"success": false}"#) {
            ApiError::Server(message) => assert_eq!(message, "HTTP 500"),
            other => panic!("unexpected {other:?}"),
        }
        match error_from_response(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") {
            ApiError::Server(message) => assert_eq!(message, "Request failed"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
