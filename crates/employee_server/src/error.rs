//! HTTP error type for employee handlers.
//!
//! Bodies are plain text. `NotFound` always renders the fixed message; the
//! other variants carry the underlying error text unchanged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

pub const NOT_FOUND_MESSAGE: &str = "Employee not found";

/// Handler-level error, converted into a response at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request body or document was refused.
    #[error("{message}")]
    BadRequest {
        /// Human readable message.
        message: String,
    },
    /// No record matched the identifier.
    #[error("Employee not found")]
    NotFound,
    /// Store or runtime failure.
    #[error("{message}")]
    Internal {
        /// Human readable message.
        message: String,
    },
}

impl ApiError {
    /// Builds a 400 error and logs it for `operation`.
    pub fn bad_request(operation: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(
            "event=http_error module=http status=rejected operation={operation} http_status=400 error={message}"
        );
        Self::BadRequest { message }
    }

    /// Builds a 500 error and logs it for `operation`.
    pub fn internal(operation: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        error!(
            "event=http_error module=http status=error operation={operation} http_status=500 error={message}"
        );
        Self::Internal { message }
    }

    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
