//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_MAX_ENTRY_SIZE;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store-level hard lifetime in seconds, the backstop for never-read entries
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Route prefix for every endpoint
    pub base_url: String,
    /// Requests allowed per caller per admission window
    pub rate_limit_max: u64,
    /// Admission window length in seconds
    pub rate_limit_window: u64,
    /// Largest stored entry in bytes
    pub max_entry_size: usize,
    /// Sweeper interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_CACHE_DURATION_IN_SECONDS` - Store life window (default: 600)
    /// - `PORT` - HTTP server port, `3000` or `:3000` (default: 3000)
    /// - `BASE_URL` - Route prefix (default: `/cache-engine-api`)
    /// - `RATE_LIMIT_MAX` - Requests per window per caller (default: 1020)
    /// - `RATE_LIMIT_WINDOW_SECONDS` - Admission window (default: 30)
    /// - `MAX_ENTRY_SIZE` - Largest stored entry in bytes (default: 1 MiB)
    /// - `CLEANUP_INTERVAL` - Sweeper frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_ttl: parse_var("DEFAULT_CACHE_DURATION_IN_SECONDS")
                .unwrap_or(defaults.default_ttl),
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.trim().trim_start_matches(':').parse().ok())
                .unwrap_or(defaults.server_port),
            base_url: env::var("BASE_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.base_url),
            rate_limit_max: parse_var("RATE_LIMIT_MAX").unwrap_or(defaults.rate_limit_max),
            rate_limit_window: parse_var("RATE_LIMIT_WINDOW_SECONDS")
                .unwrap_or(defaults.rate_limit_window),
            max_entry_size: parse_var("MAX_ENTRY_SIZE").unwrap_or(defaults.max_entry_size),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: 600,
            server_port: 3000,
            base_url: "/cache-engine-api".to_string(),
            rate_limit_max: 1020,
            rate_limit_window: 30,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            cleanup_interval: 60,
        }
    }
}
