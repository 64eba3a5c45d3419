use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phone_records_api::config::Config;
use phone_records_api::db::Database;
use phone_records_api::db_storage::PgRecordStore;
use phone_records_api::handlers::AppState;
use phone_records_api::routes;
use phone_records_api::services::PhoneRecordService;
use phone_records_api::validation_client::PhoneValidationClient;

/// Main entry point for the application.
///
/// Initializes tracing, configuration, the database pool and table, the
/// validation client and the record workflow, then serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phone_records_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database connection pool established");
    db.ensure_schema().await?;

    let validator = PhoneValidationClient::new(config.validation.clone());
    if !validator.is_active() {
        tracing::warn!("Phone validation bypassed: every number will be accepted");
    }

    let store = Arc::new(PgRecordStore::new(db.pool.clone()));
    let records = PhoneRecordService::new(store, validator);
    let app_state = Arc::new(AppState::new(records));

    // Configure per-IP rate limiter
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );

    // Health check stays outside the rate limiter
    let record_routes = routes::record_routes().layer(
        ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }),
    );

    let app: Router = routes::app(record_routes, app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
