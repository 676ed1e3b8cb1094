//! Server-specific error types
//!
//! The single place where internal failures are mapped to HTTP responses.
//! Every response body carries the stable machine-readable classification
//! next to a safe message, so clients can branch on the code without
//! parsing text and internals never leak.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jobfeed_common::ImportError;
use thiserror::Error;

use crate::api::response::ErrorResponse;

/// Result type alias for handler operations
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code and stable classification for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "DUPLICATE"),
            AppError::Import(err) => {
                let status = match err {
                    ImportError::FeedFetch { .. } => StatusCode::BAD_GATEWAY,
                    ImportError::FeedFormat { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    ImportError::QueueUnavailable(_) | ImportError::QueueCapacity(_) => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    ImportError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.classification())
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message safe to show to clients.
    fn client_message(&self) -> String {
        match self {
            AppError::Database(err) => {
                tracing::error!(error = ?err, "database error");
                "a database error occurred".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse::new(code, self.client_message());
        (status, axum::Json(body)).into_response()
    }
}
