//! Admission Control Module
//!
//! Per-client rate limiting in front of every cache operation. Excess
//! requests are rejected with 429, never queued.

mod limiter;
mod middleware;

pub use limiter::{AdmissionController, AdmissionPolicy, Decision};
pub use middleware::{admission_gate, admission_key, is_loopback, FORWARDED_FOR};
