use crate::models::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Message returned when a batch request has no usable `cuits` array.
pub const INVALID_BATCH_MESSAGE: &str = "An array of valid CUITs is required";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and JSON body.
    ///
    /// Client errors echo their message; server-side errors are logged and
    /// answered with a generic message.
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
            }),
        )
            .into_response()
    }
}

/// Failure of a single registry lookup.
///
/// The batch orchestrator turns these into `Error` results instead of
/// failing the whole request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Connection failure, timeout or other transport problem.
    Transport(String),
    /// Registry answered with a non-success status other than 404.
    HttpStatus { status: u16, reason: String },
    /// Response body was not valid JSON.
    InvalidBody(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Transport(msg) => write!(f, "{}", msg),
            LookupError::HttpStatus { status, reason } => {
                write!(f, "HTTP {}: {}", status, reason)
            }
            LookupError::InvalidBody(msg) => write!(f, "Invalid JSON response: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Transport(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            LookupError::InvalidBody(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}
