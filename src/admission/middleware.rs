//! Admission middleware
//!
//! Gates every request before routing. Loopback peers pass untouched.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::Decision;
use crate::api::AppState;
use crate::error::CacheError;

/// Header naming the originating client.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

const UNKNOWN_CALLER: &str = "unknown";

/// Derives the admission key: first `X-Forwarded-For` entry, else the peer IP.
pub fn admission_key(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match (forwarded, peer) {
        (Some(client), _) => client.to_string(),
        (None, Some(ip)) => ip.to_string(),
        (None, None) => UNKNOWN_CALLER.to_string(),
    }
}

/// Loopback check that also accepts IPv4-mapped IPv6 peers (`::ffff:127.0.0.1`).
pub fn is_loopback(ip: IpAddr) -> bool {
    ip.to_canonical().is_loopback()
}

/// Whole seconds until `remaining` elapses, rounded up.
fn ceil_secs(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

/// Axum middleware applying the admission policy.
pub async fn admission_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if peer.is_some_and(is_loopback) {
        return next.run(req).await;
    }

    let key = admission_key(req.headers(), peer);
    match state.limiter.check(&key) {
        Decision::Allowed {
            remaining,
            reset_after,
        } => {
            let limit = state.limiter.policy().max_requests;
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            headers.insert(
                "x-ratelimit-reset",
                HeaderValue::from(ceil_secs(reset_after)),
            );
            response
        }
        Decision::Rejected { retry_after } => {
            debug!("Admission rejected for caller '{}'", key);
            CacheError::TooManyRequests {
                retry_after_secs: ceil_secs(retry_after),
            }
            .into_response()
        }
    }
}
