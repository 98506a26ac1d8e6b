//! Product price history API server entry point.

use std::sync::Arc;

use pricing_api::app::build_router;
use pricing_api::config::AppConfig;
use pricing_api::error::AppError;
use pricing_api::state::AppState;
use pricing_api::telemetry;
use pricing_catalog::InMemoryProductCatalog;
use pricing_core::clock::SystemClock;
use pricing_core::ids::RandomIdGenerator;
use pricing_event_store::migrations::MIGRATOR;
use pricing_event_store::PgEventLog;
use sqlx::postgres::PgPoolOptions;

async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; price history is kept in memory only");
        return Ok(AppState::in_memory());
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    MIGRATOR.run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(AppState::new(
        Arc::new(PgEventLog::new(pool)),
        "postgres",
        Arc::new(InMemoryProductCatalog::new()),
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let _telemetry = telemetry::init(config.log_format, config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting product price history API server");

    let app_state = build_state(&config).await?;
    let app = build_router(app_state, config.request_timeout);

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
