//! Unified error handling for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for calls into a backend service
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Classification carried by every failed backend call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("backend error: {0}")]
    Other(String),
}

impl BackendError {
    /// Transient unavailability is the only failure the gateway treats as recoverable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable(_))
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, BackendError::Unauthenticated(_))
    }

    /// Short label used in logs and metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::NotFound(_) => "not_found",
            BackendError::InvalidArgument(_) => "invalid_argument",
            BackendError::Unauthenticated(_) => "unauthenticated",
            BackendError::Unavailable(_) => "unavailable",
            BackendError::Other(_) => "other",
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Actor is missing or could not be resolved
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Actor is known but the authorization chain denied the mutation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Not acceptable: {0}")]
    NotAcceptable(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Backend unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "A backend service is temporarily unavailable".to_string(),
                )
            }
            AppError::NotAcceptable(msg) => (StatusCode::NOT_ACCEPTABLE, "not_acceptable", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(msg) => AppError::NotFound(msg),
            BackendError::InvalidArgument(msg) => AppError::Validation(msg),
            BackendError::Unauthenticated(msg) => AppError::Forbidden(msg),
            BackendError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            BackendError::Other(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
