//! Response DTOs for the cache server API
//!
//! Every endpoint answers with the same envelope:
//! `{status, message?, cache, validation_error?}`.

use serde::Serialize;
use serde_json::Value;

use super::requests::ValidationErrors;

/// Envelope outcome marker, serialized as `"OK"` or `"ERROR"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

// == Envelope ==
/// Response body shared by all cache endpoints.
///
/// `cache` is always present (possibly `null`).
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T = Value> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cache: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<ValidationErrors>,
}

impl<T> ApiResponse<T> {
    /// OK with a payload and no message.
    pub fn found(cache: T) -> Self {
        Self {
            status: Status::Ok,
            message: None,
            cache: Some(cache),
            validation_error: None,
        }
    }

    /// OK with a payload and a message.
    pub fn ok(message: impl Into<String>, cache: T) -> Self {
        Self {
            status: Status::Ok,
            message: Some(message.into()),
            cache: Some(cache),
            validation_error: None,
        }
    }
}

impl ApiResponse {
    /// OK with `cache: null`.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: Some(message.into()),
            cache: None,
            validation_error: None,
        }
    }

    /// ERROR with `cache: null`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            cache: None,
            validation_error: None,
        }
    }

    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self {
            status: Status::Error,
            message: Some("Validation error".to_string()),
            cache: None,
            validation_error: Some(errors),
        }
    }
}

/// `cache` payload for `GET /get`.
#[derive(Debug, Clone, Serialize)]
pub struct CachedValue {
    pub key: String,
    pub value: Value,
}

/// `cache` payload for `POST /create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedEntry {
    pub key: String,
    pub value: String,
    pub duration_in_seconds: u64,
}

/// `cache` payload for `DELETE /delete/:key`.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedKey {
    pub key: String,
}

/// `cache` payload for `GET /exists/:key`.
#[derive(Debug, Clone, Serialize)]
pub struct Existence {
    pub exists: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
