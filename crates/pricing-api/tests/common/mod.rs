//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use pricing_catalog::InMemoryProductCatalog;
use pricing_event_store::InMemoryEventLog;
use pricing_test_support::{SequenceIds, SteppingClock};
use tower::ServiceExt;

use pricing_api::app::build_router;
use pricing_api::state::AppState;

/// Application state over a fresh in-memory log. The clock starts on
/// 2026-01-15 and advances one day per event; product ids start at 1.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryEventLog::new()),
        "memory",
        Arc::new(InMemoryProductCatalog::new()),
        Arc::new(SteppingClock::daily(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )),
        Arc::new(SequenceIds::starting_at(1)),
    )
}

/// Build the full app router around `state`, exactly as `main.rs` does.
pub fn build_test_app(state: AppState) -> Router {
    build_router(state, Duration::from_secs(5))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn with_json(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, with_json("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, with_json("PUT", uri, body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
