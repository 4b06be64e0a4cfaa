//! Cross-cutting error taxonomy (spec §7) shared by all three services.
//!
//! Every HTTP edge in the platform maps errors to status codes through this
//! single enum rather than inventing its own per-service mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// The error taxonomy of spec §7.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete input. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An illegal alert/notification lifecycle transition was requested.
    #[error("illegal state transition: {0}")]
    StateTransition(String),

    /// Persistence failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Publish/subscribe to the event bus failed.
    #[error("bus error: {0}")]
    Bus(String),

    /// An outbound call to a sibling service failed.
    #[error("downstream error: {0}")]
    Downstream(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StateTransition(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Bus(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Result alias for HTTP handlers across all three services.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
