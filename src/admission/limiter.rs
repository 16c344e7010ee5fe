//! Fixed-window request counter
//!
//! Counts requests per admission key inside a fixed window that opens on the
//! key's first hit. Counting goes through the map's per-shard entry lock, so
//! concurrent hits on one key are never lost or double-counted.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::Config;

/// Limit and window shared by every caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Requests allowed per caller per window
    pub max_requests: u64,
    /// Window length
    pub window: Duration,
}

impl AdmissionPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_requests: config.rate_limit_max,
            window: Duration::from_secs(config.rate_limit_window),
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            max_requests: 1020,
            window: Duration::from_secs(30),
        }
    }
}

/// Result of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed {
        remaining: u64,
        reset_after: Duration,
    },
    Rejected {
        retry_after: Duration,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    hits: u64,
}

// == Admission Controller ==
/// Per-caller request gate.
#[derive(Debug)]
pub struct AdmissionController {
    policy: AdmissionPolicy,
    windows: DashMap<String, Window>,
}

impl AdmissionController {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            windows: DashMap::new(),
        }
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    // == Check ==
    /// Counts one request from `key` and decides whether it may pass.
    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    /// [`AdmissionController::check`] against an explicit clock reading.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut window = self.windows.entry(key.to_string()).or_insert(Window {
            opened_at: now,
            hits: 0,
        });

        let elapsed = now.saturating_duration_since(window.opened_at);
        if elapsed >= self.policy.window {
            window.opened_at = now;
            window.hits = 0;
        }

        window.hits += 1;
        let reset_after = self
            .policy
            .window
            .saturating_sub(now.saturating_duration_since(window.opened_at));

        if window.hits > self.policy.max_requests {
            Decision::Rejected {
                retry_after: reset_after,
            }
        } else {
            Decision::Allowed {
                remaining: self.policy.max_requests - window.hits,
                reset_after,
            }
        }
    }

    // == Purge Expired ==
    /// Drops windows that have closed. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.opened_at) < self.policy.window);
        before.saturating_sub(self.windows.len())
    }

    /// Number of callers with an open window.
    pub fn tracked_callers(&self) -> usize {
        self.windows.len()
    }
}
