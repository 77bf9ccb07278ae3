//! Application error type and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::api::ApiError;

/// Convenience alias used by route handlers.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced from route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Api(ApiError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Api(ApiError::AccessDenied) => StatusCode::FORBIDDEN,
            Self::Api(ApiError::Http(_) | ApiError::Parse(_) | ApiError::Server(_)) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Api(ApiError::Session(_)) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A rejected token means the session is already cleared; send the
        // admin back to the login page instead of rendering an error.
        if matches!(self, Self::Api(ApiError::Unauthorized)) {
            return Redirect::to("/login").into_response();
        }

        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            sentry::capture_error(&self);
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        // Internal detail stays in the logs.
        let body = match &self {
            Self::NotFound => "Page not found".to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Api(api @ (ApiError::Validation(_) | ApiError::AccessDenied)) => {
                api.to_string()
            }
            _ => "Something went wrong".to_string(),
        };

        (status, body).into_response()
    }
}
