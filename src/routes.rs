use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{self, AppState};
use crate::openapi::ApiDoc;

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Record endpoints, without state attached.
///
/// The server binary wraps these in a rate limiter before merging them.
pub fn record_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/records",
            post(handlers::create_record).get(handlers::list_records),
        )
        .route("/records/:id", get(handlers::get_record))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Assembles the full application from already-layered record routes.
pub fn app(records: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(records)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Application router without rate limiting, as used by tests.
pub fn router(state: Arc<AppState>) -> Router {
    app(record_routes(), state)
}
