//! Routes for the price history context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pricing_streams::application::command_handlers::PricingCommandResult;
use pricing_streams::application::query_handlers::PriceHistoryView;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /enrollments.
#[derive(Debug, Deserialize)]
pub struct EnrollmentRequest {
    /// The product to enroll.
    pub product_id: i64,
    /// The chain to enroll it in.
    pub shop_chain_id: i64,
    /// Chain-wide baseline price.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub initial_price: Decimal,
}

/// Request body for POST /price-changes.
#[derive(Debug, Deserialize)]
pub struct PriceChangeRequest {
    /// The product whose price changed.
    pub product_id: i64,
    /// The chain the shop belongs to.
    pub shop_chain_id: i64,
    /// The shop that changed the price.
    pub shop_id: i64,
    /// The new price.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub new_price: Decimal,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The stream the events were appended to.
    pub stream_key: String,
    /// Position of the last appended event.
    pub stream_position: u64,
    /// IDs of the appended events.
    pub event_ids: Vec<Uuid>,
}

impl From<PricingCommandResult> for CommandResponse {
    fn from(result: PricingCommandResult) -> Self {
        Self {
            stream_key: result.stream_key.to_string(),
            stream_position: result.stream_position.value(),
            event_ids: result.event_ids,
        }
    }
}

/// POST /enrollments
#[instrument(
    skip(state, request),
    fields(product_id = request.product_id, shop_chain_id = request.shop_chain_id)
)]
async fn enroll_product(
    State(state): State<AppState>,
    Json(request): Json<EnrollmentRequest>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let result = state
        .pricing
        .enroll_product_in_chain(request.product_id, request.shop_chain_id, request.initial_price)
        .await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /price-changes
#[instrument(
    skip(state, request),
    fields(
        product_id = request.product_id,
        shop_chain_id = request.shop_chain_id,
        shop_id = request.shop_id,
    )
)]
async fn record_price_change(
    State(state): State<AppState>,
    Json(request): Json<PriceChangeRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let result = state
        .pricing
        .record_price_change(
            request.product_id,
            request.shop_chain_id,
            request.shop_id,
            request.new_price,
        )
        .await?;

    Ok(Json(result.into()))
}

/// GET /{product_id}/{shop_chain_id}
async fn get_price_history(
    State(state): State<AppState>,
    Path((product_id, shop_chain_id)): Path<(i64, i64)>,
) -> Result<Json<PriceHistoryView>, ApiError> {
    let view = state
        .pricing
        .get_price_history(product_id, shop_chain_id)
        .await?;
    Ok(Json(view))
}

/// Returns the router for the price history context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enrollments", post(enroll_product))
        .route("/price-changes", post(record_price_change))
        .route("/{product_id}/{shop_chain_id}", get(get_price_history))
}
