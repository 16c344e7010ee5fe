//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::cache::StoreError;
use crate::models::{ApiResponse, ValidationErrors};

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key was never set, or has already been reaped
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was set but its lifetime lapsed; the entry has been deleted
    #[error("Key expired: {0}")]
    Expired(String),

    /// Stored bytes could not be decoded
    #[error("Corrupt entry under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Creation request failed validation
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// Underlying store failed for a reason other than absence
    #[error("Store operation failed for key '{key}': {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Entry could not be serialized before writing
    #[error("Failed to encode entry: {0}")]
    Encode(#[source] serde_json::Error),

    /// Request body could not be read as a creation request
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Caller exceeded its admission window
    #[error("Too many requests, retry after {retry_after_secs}s")]
    TooManyRequests { retry_after_secs: u64 },
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        // Store and codec detail stays in the server log.
        let (status, body) = match self {
            CacheError::NotFound(_) => (StatusCode::OK, ApiResponse::ok_empty("Key not found")),
            CacheError::Expired(_) => (StatusCode::OK, ApiResponse::ok_empty("Key is expired")),
            CacheError::Corrupt { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error("Failed to decode cache entry"),
            ),
            CacheError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::validation_failed(errors),
            ),
            CacheError::Store { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error("Something went wrong with the cache store"),
            ),
            CacheError::Encode(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error("Failed to encode cache entry"),
            ),
            CacheError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, ApiResponse::error(msg)),
            CacheError::TooManyRequests { retry_after_secs } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ApiResponse::error("Too many requests, please slow down")),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                return response;
            }
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
