//! Liveness endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
    /// Which event log backs the service (`"memory"` or `"postgres"`).
    pub event_log: &'static str,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        event_log: state.event_log_backend,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
