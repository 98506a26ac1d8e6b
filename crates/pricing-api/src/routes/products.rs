//! Routes for the product catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pricing_catalog::application::{command_handlers, query_handlers};
use pricing_catalog::domain::commands;
use pricing_core::catalog::Product;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize)]
pub struct ProductDetailsRequest {
    /// Display name.
    pub name: String,
    /// Product category.
    pub category: String,
}

/// POST /
#[instrument(skip_all)]
async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<ProductDetailsRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let command = commands::CreateProduct {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        category: request.category,
    };

    let product =
        command_handlers::handle_create_product(&command, state.ids.as_ref(), &*state.catalog)
            .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = query_handlers::list_products(&*state.catalog).await?;
    Ok(Json(products))
}

/// GET /{product_id}
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = query_handlers::get_product_by_id(product_id, &*state.catalog).await?;
    Ok(Json(product))
}

/// PUT /{product_id}
#[instrument(skip(state, request))]
async fn save_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(request): Json<ProductDetailsRequest>,
) -> Result<Json<Product>, ApiError> {
    let command = commands::SaveProduct {
        correlation_id: Uuid::new_v4(),
        product_id,
        name: request.name,
        category: request.category,
    };

    let product = command_handlers::handle_save_product(&command, &*state.catalog).await?;

    Ok(Json(product))
}

/// Returns the router for the product catalog.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{product_id}", get(get_product).put(save_product))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use pricing_catalog::InMemoryProductCatalog;
    use pricing_core::clock::SystemClock;
    use pricing_event_store::InMemoryEventLog;
    use pricing_test_support::SequenceIds;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        AppState::new(
            Arc::new(InMemoryEventLog::new()),
            "memory",
            Arc::new(InMemoryProductCatalog::new()),
            Arc::new(SystemClock),
            Arc::new(SequenceIds::starting_at(7)),
        )
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_product_returns_201_with_generated_id() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "name": "Oat milk", "category": "Dairy alternatives" });

        // Act
        let response = app.oneshot(json_request("POST", "/", &body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Oat milk");
        assert_eq!(json["category"], "Dairy alternatives");
    }

    #[tokio::test]
    async fn test_create_product_with_blank_name_returns_400() {
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "name": "", "category": "Dairy alternatives" });

        let response = app.oneshot(json_request("POST", "/", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_put_then_get_returns_saved_product() {
        let state = test_app_state();
        let body = serde_json::json!({ "name": "Rye loaf", "category": "Bakery" });
        let put = router()
            .with_state(state.clone())
            .oneshot(json_request("PUT", "/42", &body))
            .await
            .unwrap();
        assert_eq!(put.status(), StatusCode::OK);

        let response = router()
            .with_state(state)
            .oneshot(Request::builder().uri("/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], 42);
        assert_eq!(json["name"], "Rye loaf");
    }

    #[tokio::test]
    async fn test_get_unknown_product_returns_404() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(Request::builder().uri("/9").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "product_not_found");
    }

    #[tokio::test]
    async fn test_get_with_non_numeric_id_returns_400() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(Request::builder().uri("/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
