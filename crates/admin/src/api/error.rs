//! Error type for upstream API calls.

use thiserror::Error;

use crate::session::SessionStoreError;

/// Failures talking to the store API.
///
/// Non-2xx responses are classified by status family so callers can decide
/// what is recoverable: validation failures surface on the page that caused
/// them, everything else bubbles to the shared error handling.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The upstream rejected our bearer token. The session has already been
    /// cleared by the time this is returned.
    #[error("Unauthorized")]
    Unauthorized,

    /// Login succeeded but the account is not an admin.
    #[error("Access denied. Admin privileges required.")]
    AccessDenied,

    /// 4xx response; carries the upstream message verbatim.
    #[error("{0}")]
    Validation(String),

    /// 5xx response; carries the upstream message verbatim.
    #[error("{0}")]
    Server(String),

    /// The session file could not be updated.
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl ApiError {
    /// Whether this error should be shown inline on the page that triggered
    /// it rather than replacing the page with an error response.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Server(_) | Self::AccessDenied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_strings() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(
            ApiError::AccessDenied.to_string(),
            "Access denied. Admin privileges required."
        );
        assert_eq!(
            ApiError::Validation("Title is required".to_string()).to_string(),
            "Title is required"
        );
        assert_eq!(
            ApiError::Server("HTTP 503".to_string()).to_string(),
            "HTTP 503"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ApiError::Validation(String::new()).is_recoverable());
        assert!(ApiError::Server(String::new()).is_recoverable());
        assert!(ApiError::AccessDenied.is_recoverable());
        assert!(!ApiError::Unauthorized.is_recoverable());
    }
}
