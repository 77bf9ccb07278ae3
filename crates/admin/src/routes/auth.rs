//! Login and logout handlers.
//!
//! Login posts credentials to the store API. Failures re-render the form
//! with the message inline, keeping the typed email; only a success leaves
//! the page. Logout clears the persisted session and returns to the login
//! page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use super::MessageQuery;
use crate::api::ApiError;
use crate::middleware::auth::{OptionalAdmin, message_for_code};
use crate::services::review_poll;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

/// Display the login page.
///
/// An already-authenticated admin is sent straight to the dashboard. The
/// `error` query parameter carries a reason code from the session guard;
/// unknown values are ignored rather than reflected.
#[instrument(skip(admin))]
pub async fn login_page(
    OptionalAdmin(admin): OptionalAdmin,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let error = query
        .error
        .as_deref()
        .and_then(message_for_code)
        .map(ToString::to_string);

    LoginTemplate {
        error,
        email: String::new(),
    }
    .into_response()
}

/// Handle the login form.
///
/// Every failure renders inline; a wrong password must never trip the
/// forced-logout path or lose the page.
#[instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.trim().to_string();

    if email.is_empty() || form.password.is_empty() {
        return LoginTemplate {
            error: Some("Please fill in all fields".to_string()),
            email,
        }
        .into_response();
    }

    let password = SecretString::from(form.password);
    match state.api().login(&email, &password).await {
        Ok(_session) => {
            // Populate the review badge without waiting for the next poll.
            let poll_state = state.clone();
            tokio::spawn(async move {
                review_poll::refresh_reviews(&poll_state).await;
            });

            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            LoginTemplate {
                error: Some(login_error_message(&e)),
                email,
            }
            .into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.session().clear().await {
        tracing::error!("Failed to clear session on logout: {e}");
    }

    tracing::info!("Admin logged out");
    Redirect::to("/login")
}

/// Message shown on the login form for a failed attempt. Transport and
/// decode failures collapse to a generic line; everything else is already
/// user-facing text.
fn login_error_message(e: &ApiError) -> String {
    if e.is_recoverable() {
        e.to_string()
    } else {
        "Login failed".to_string()
    }
}
