//! Cache Engine - an HTTP key-value cache with per-entry TTL
//!
//! Values are stored with an absolute expiration and expired lazily on read.
//! A per-client admission controller guards every endpoint.

pub mod admission;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_sweeper_task;
