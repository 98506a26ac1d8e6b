//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pricing_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The tracing pipeline could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and machine-readable code for the wrapped error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::AlreadyEnrolled { .. } => (StatusCode::CONFLICT, "already_enrolled"),
            DomainError::NotEnrolled { .. } => (StatusCode::CONFLICT, "not_enrolled"),
            DomainError::NoHistory { .. } => (StatusCode::NOT_FOUND, "no_history"),
            DomainError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "product_not_found"),
            DomainError::UnknownEventType { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "unknown_event_type")
            }
            DomainError::MalformedEvent { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "malformed_event")
            }
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self.0, code = error_code, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
