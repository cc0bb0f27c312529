//! Error handling for the AyurChain dashboard server
//!
//! Distinguishes "no such batch" (a normal empty result) from failures to
//! reach the batch source (retryable), and renders both consistently.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{LookupError, PayloadError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    // Lookup results
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Batch id {batch_id} is shared by {occurrences} records")]
    DuplicateBatchId { batch_id: String, occurrences: usize },

    // Batch source errors
    #[error("Batch source unavailable: {0}")]
    TransportFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransportFailure(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::TransportFailure(format!("Database query failed: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransportFailure(format!("Batch API request failed: {}", err))
    }
}

impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        AppError::TransportFailure(format!("Malformed batch payload: {}", err))
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(batch_id) => AppError::NotFound(format!("Batch {}", batch_id)),
            LookupError::DuplicateBatchId {
                batch_id,
                occurrences,
            } => AppError::DuplicateBatchId {
                batch_id,
                occurrences,
            },
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                Some("batch_id".to_string()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", resource),
                None,
            ),
            AppError::DuplicateBatchId {
                batch_id,
                occurrences,
            } => (
                StatusCode::CONFLICT,
                "DUPLICATE_BATCH_ID",
                format!(
                    "Batch id {} is shared by {} records; the data needs correcting",
                    batch_id, occurrences
                ),
                Some("batch_id".to_string()),
            ),
            AppError::TransportFailure(_) => (
                StatusCode::BAD_GATEWAY,
                "TRANSPORT_FAILURE",
                "Error loading batch data. Please try again.".to_string(),
                None,
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                format!("Configuration error: {}", msg),
                None,
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
                None,
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                None,
            ),
        };

        // Expected outcomes are not errors from the server's point of view
        match &self {
            AppError::NotFound(_) | AppError::ValidationError(_) => {
                tracing::debug!("Request rejected: {}", self)
            }
            AppError::TransportFailure(_) => tracing::warn!("Error: {}", self),
            _ => tracing::error!("Error: {:?}", self),
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                retryable: self.is_retryable(),
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
