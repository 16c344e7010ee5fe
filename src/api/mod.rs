//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET {base}/get?key=` - Retrieve a live value
//! - `POST {base}/create` - Store a value with a lifetime
//! - `DELETE {base}/delete/:key` - Delete a key
//! - `GET {base}/exists/:key` - Check for a live key
//! - `GET {base}/health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
