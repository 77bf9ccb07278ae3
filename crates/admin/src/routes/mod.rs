//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//! GET  /                        - Redirect to /dashboard
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! POST /logout                  - Logout action
//!
//! # Dashboard
//! GET  /dashboard               - Sales and catalog overview
//!
//! # Products
//! GET  /products                - Product listing (search)
//! GET  /products/new            - New product form
//! POST /products                - Create product
//! GET  /products/{id}/edit      - Edit product form
//! POST /products/{id}           - Update product
//! POST /products/{id}/delete    - Delete product
//!
//! # Orders
//! GET  /orders                  - Order listing (status, date filters)
//! POST /orders/{id}/status      - Update fulfillment status
//!
//! # Customers
//! GET  /customers               - Customer listing (search)
//! GET  /customers/new           - New customer form
//! POST /customers               - Create customer
//! GET  /customers/{id}/edit     - Edit customer form
//! POST /customers/{id}          - Update customer
//! POST /customers/{id}/status   - Activate or suspend account
//! POST /customers/{id}/delete   - Delete customer
//!
//! # Reviews
//! GET  /reviews                 - Review moderation (pending/approved/all)
//! POST /reviews/{id}/approve    - Approve review
//! POST /reviews/{id}/reject     - Reject review
//! POST /reviews/{id}/delete     - Delete review
//! ```
//!
//! Every page handler takes `RequireAdmin` first, so an unusable session
//! never reaches the upstream API. Mutations are plain form posts that
//! redirect back to their listing, carrying a `?success=` or `?error=`
//! message for the banner.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::api::ApiError;
use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

/// Query parameters for banner display on listing pages.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Admin identity shown in the page chrome.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&Session> for AdminUserView {
    fn from(session: &Session) -> Self {
        Self {
            name: session.user.display_name().to_string(),
            email: session.user.email.clone(),
        }
    }
}

/// Resolve a page-level fetch.
///
/// Recoverable upstream failures keep the page rendering with a banner and
/// no data; a rejected token bubbles out so the shared error mapping sends
/// the admin to the login page.
pub fn fetched_or_banner<T>(
    result: Result<T, ApiError>,
    what: &str,
) -> Result<(Option<T>, Option<String>), AppError> {
    match result {
        Ok(value) => Ok((Some(value), None)),
        Err(e @ ApiError::Unauthorized) => Err(e.into()),
        Err(e) => {
            tracing::warn!("Failed to load {what}: {e}");
            let message = if e.is_recoverable() {
                e.to_string()
            } else {
                format!("Failed to load {what}")
            };
            Ok((None, Some(message)))
        }
    }
}

/// Redirect back to `base` with a banner error message.
pub fn redirect_with_error(base: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{base}?error={}", urlencoding::encode(message)))
}

/// Redirect back to `base` with a banner success message.
pub fn redirect_with_success(base: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{base}?success={}", urlencoding::encode(message)))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}/delete", post(products::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/status", post(orders::update_status))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::create))
        .route("/new", get(customers::new))
        .route("/{id}", post(customers::update))
        .route("/{id}/edit", get(customers::edit))
        .route("/{id}/status", post(customers::set_status))
        .route("/{id}/delete", post(customers::delete))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index))
        .route("/{id}/approve", post(reviews::approve))
        .route("/{id}/reject", post(reviews::reject))
        .route("/{id}/delete", post(reviews::delete))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        // The panel opens on the dashboard
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(dashboard::index))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/customers", customer_routes())
        .nest("/reviews", review_routes())
        .merge(auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the store API.
pub async fn health() -> &'static str {
    "ok"
}

/// Build the admin application: routes, static assets, request tracing.
///
/// Sentry layers go on top of this in `main`; tests serve the router
/// directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/admin/static"))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
