//! Integration Tests for Admission Control
//!
//! Drives the router in-process for the limit boundary and a real loopback
//! listener for the bypass.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use cache_engine::{
    admission::{AdmissionController, AdmissionPolicy, FORWARDED_FOR},
    cache::MemoryStore,
    create_router, AppState,
};
use serde_json::Value;
use tokio_test::assert_ok;
use tower::ServiceExt;

const LIMIT: u64 = 5;

fn limited_app(max_requests: u64) -> Router {
    let store = MemoryStore::new(Duration::from_secs(300), 1024 * 1024).unwrap();
    let limiter = AdmissionController::new(AdmissionPolicy {
        max_requests,
        window: Duration::from_secs(30),
    });
    create_router(AppState::new(Arc::new(store), Arc::new(limiter)), "")
}

fn request_from(client: &str) -> Request<Body> {
    Request::builder()
        .uri("/exists/k")
        .header(FORWARDED_FOR, client)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_limit_boundary() {
    let app = limited_app(LIMIT);

    for _ in 0..LIMIT {
        let response = app.clone().oneshot(request_from("203.0.113.9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(request_from("203.0.113.9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ERROR");
    assert!(json["cache"].is_null());

    // Another caller still has its own budget.
    let response = app.oneshot(request_from("203.0.113.10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_budget() {
    let app = limited_app(LIMIT);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { app.oneshot(request_from("198.51.100.1")).await.unwrap() })
        })
        .collect();

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap().status() == StatusCode::OK {
            allowed += 1;
        }
    }

    assert_eq!(allowed, LIMIT);
}

#[tokio::test]
async fn test_loopback_peer_bypasses_limit() {
    let app = limited_app(1);
    let loopback: SocketAddr = ([127, 0, 0, 1], 40000).into();

    for _ in 0..10 {
        let mut request = request_from("203.0.113.9");
        request.extensions_mut().insert(ConnectInfo(loopback));

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-ratelimit-remaining"));
    }
}

#[tokio::test]
async fn test_ipv6_loopback_peers_bypass_limit() {
    let app = limited_app(1);
    let peers: [SocketAddr; 2] = [
        "[::1]:40000".parse().unwrap(),
        "[::ffff:127.0.0.1]:40000".parse().unwrap(),
    ];

    for peer in peers {
        for _ in 0..10 {
            let mut request = request_from("203.0.113.9");
            request.extensions_mut().insert(ConnectInfo(peer));

            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "peer {peer} was limited");
        }
    }
}

#[tokio::test]
async fn test_retry_after_rounds_up_to_whole_window() {
    let app = limited_app(1);

    app.clone().oneshot(request_from("198.51.100.4")).await.unwrap();
    let response = app.oneshot(request_from("198.51.100.4")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    // Rejected well inside the 30 s window, so the remainder rounds up to 30.
    assert_eq!(retry_after, 30);
}

#[tokio::test]
async fn test_remote_peer_is_limited() {
    let app = limited_app(1);
    let remote: SocketAddr = ([192, 0, 2, 50], 40000).into();

    let mut statuses = Vec::new();
    for _ in 0..2 {
        let mut request = Request::builder()
            .uri("/exists/k")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(remote));
        statuses.push(app.clone().oneshot(request).await.unwrap().status());
    }

    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]);
}

#[tokio::test]
async fn test_real_loopback_listener_is_never_limited() {
    let app = limited_app(2);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let client = reqwest::Client::new();
    for _ in 0..10 {
        let response = assert_ok!(
            client
                .post(format!("http://{}/create", addr))
                .header(FORWARDED_FOR, "203.0.113.77")
                .json(&serde_json::json!({
                    "key": "loop",
                    "value": "back",
                    "duration_in_seconds": 10
                }))
                .send()
                .await
        );
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    let body: Value = client
        .get(format!("http://{}/get?key=loop", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["cache"]["value"], "back");

    server.abort();
}
