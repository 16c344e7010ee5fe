//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, delete_handler, exists_handler, get_handler, health_handler, AppState,
};
use crate::admission::admission_gate;

/// Creates the main router with all endpoints mounted under `base_url`.
///
/// # Endpoints
/// - `GET {base}/get?key=` - Retrieve a live value
/// - `POST {base}/create` - Store a value with a lifetime
/// - `DELETE {base}/delete/:key` - Delete a key
/// - `GET {base}/exists/:key` - Check for a live key
/// - `GET {base}/health` - Health check endpoint
///
/// # Middleware
/// - Admission: per-caller rate limit on every route
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState, base_url: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let endpoints = Router::new()
        .route("/get", get(get_handler))
        .route("/create", post(create_handler))
        .route("/delete/:key", delete(delete_handler))
        .route("/exists/:key", get(exists_handler))
        .route("/health", get(health_handler));

    // Axum refuses to nest at the root.
    let base = base_url.trim().trim_matches('/');
    let router = if base.is_empty() {
        endpoints
    } else {
        Router::new().nest(&format!("/{}", base), endpoints)
    };

    router
        .layer(middleware::from_fn_with_state(state.clone(), admission_gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
