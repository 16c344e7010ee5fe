//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers only
//! shape requests and responses; cache semantics live in [`TtlCache`].

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::admission::AdmissionController;
use crate::cache::{KvStore, TtlCache};
use crate::error::{CacheError, Result};
use crate::models::{
    ApiResponse, CacheCreationRequest, CachedValue, CreatedEntry, DeletedKey, Existence, GetQuery,
    HealthResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// TTL-aware cache over the shared store
    pub cache: TtlCache,
    /// Per-caller admission gate
    pub limiter: Arc<AdmissionController>,
}

impl AppState {
    /// Creates a new AppState over the given store and admission controller.
    pub fn new(store: Arc<dyn KvStore>, limiter: Arc<AdmissionController>) -> Self {
        Self {
            cache: TtlCache::new(store),
            limiter,
        }
    }
}

/// Handler for GET /get?key=
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<GetQuery>,
) -> Result<Json<ApiResponse<CachedValue>>> {
    let value = state.cache.get(&query.key)?;

    Ok(Json(ApiResponse::found(CachedValue {
        key: query.key,
        value,
    })))
}

/// Handler for POST /create
pub async fn create_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CacheCreationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CreatedEntry>>> {
    let Json(request) = body.map_err(|rejection| CacheError::InvalidBody(rejection.body_text()))?;
    let valid = request.validate().map_err(CacheError::Validation)?;

    state.cache.set(
        &valid.key,
        Value::String(valid.value.clone()),
        valid.duration_in_seconds,
    )?;

    Ok(Json(ApiResponse::ok(
        "Value set successfully",
        CreatedEntry {
            key: valid.key,
            value: valid.value,
            duration_in_seconds: valid.duration_in_seconds,
        },
    )))
}

/// Handler for DELETE /delete/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<DeletedKey>>> {
    if !state.cache.delete(&key)? {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(ApiResponse::ok(
        "Cache deleted successfully",
        DeletedKey { key },
    )))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<Existence>>> {
    let exists = state.cache.exists(&key)?;
    let message = if exists {
        "Cache exists"
    } else {
        "Cache does not exist"
    };

    Ok(Json(ApiResponse::ok(message, Existence { exists })))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
