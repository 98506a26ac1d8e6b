//! Router assembly shared by the binary and the integration tests.

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Builds the full application router.
///
/// A request still running after `request_timeout` is answered with 408 and
/// its handler future is dropped, which cancels any in-flight append before
/// it is acknowledged.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/products", routes::products::router())
        .nest("/api/v1/pricing", routes::pricing::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
