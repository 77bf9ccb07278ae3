//! Session guard for admin pages.
//!
//! Every protected handler takes [`RequireAdmin`] as an argument. The guard
//! admits a request only when the stored session has a non-empty token and
//! an admin profile; anything else redirects to the login page with a reason
//! code the login page turns into a banner message.
//!
//! Only sessions that are present but unusable are cleared. A merely missing
//! session has nothing to clear, and clearing must stay idempotent so
//! concurrent rejected requests do not trample each other.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use crate::session::{Session, StoredSession};
use crate::state::AppState;

/// Admits only a logged-in admin; holds the proven session.
pub struct RequireAdmin(pub Session);

/// Why the guard turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// No session is stored.
    Unauthorized,
    /// A session is stored but the account is not an admin.
    NotAdmin,
    /// A session is stored but cannot be read as one.
    InvalidSession,
}

impl GuardRejection {
    /// Reason code carried in the login redirect as `?error=<code>`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotAdmin => "not_admin",
            Self::InvalidSession => "invalid_session",
        }
    }
}

/// Banner message the login page shows for a reason code from the guard.
#[must_use]
pub fn message_for_code(code: &str) -> Option<&'static str> {
    match code {
        "unauthorized" => Some("Please login to access admin panel"),
        "not_admin" => Some("Access denied. Admin privileges required."),
        "invalid_session" => Some("Your session has expired. Please login again."),
        _ => None,
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.session().get().await {
            StoredSession::Active(session) if session.user.is_admin => Ok(Self(session)),
            StoredSession::Active(_) => {
                clear_session(state, "non-admin").await;
                Err(GuardRejection::NotAdmin)
            }
            StoredSession::Corrupt => {
                clear_session(state, "corrupt").await;
                Err(GuardRejection::InvalidSession)
            }
            StoredSession::Missing => Err(GuardRejection::Unauthorized),
        }
    }
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = self.code(), "Admin access refused");
        Redirect::to(&format!("/login?error={}", self.code())).into_response()
    }
}

/// Session state for pages that render either way. The login page uses this
/// to bounce an already-authenticated admin to the dashboard.
///
/// A stored non-admin session yields `None` but is left in place; only a
/// corrupt one is cleared here.
pub struct OptionalAdmin(pub Option<Session>);

impl FromRequestParts<AppState> for OptionalAdmin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.session().get().await {
            StoredSession::Active(session) if session.user.is_admin => Ok(Self(Some(session))),
            StoredSession::Corrupt => {
                clear_session(state, "corrupt").await;
                Ok(Self(None))
            }
            StoredSession::Active(_) | StoredSession::Missing => Ok(Self(None)),
        }
    }
}

async fn clear_session(state: &AppState, why: &str) {
    if let Err(e) = state.session().clear().await {
        tracing::warn!(error = %e, why, "Failed to clear unusable session");
    }
}
