use crate::errors::AppError;
use crate::models::{ErrorBody, PhoneRecordRequest, PhoneRecordResponse};
use crate::services::PhoneRecordService;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record workflow, backed by the configured store and validation client.
    pub records: PhoneRecordService,
}

impl AppState {
    pub fn new(records: PhoneRecordService) -> Self {
        Self { records }
    }
}

/// Health check endpoint.
///
/// Returns the service status, version, and whether phone validation is live.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let validation = if state.records.validation_active() {
        "active"
    } else {
        "bypassed"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "phone-records-api",
            "version": env!("CARGO_PKG_VERSION"),
            "phoneValidation": validation,
        })),
    )
}

/// POST /records
///
/// Creates a phone record. The number must not already be stored and must
/// pass external validation when it is enabled.
#[utoipa::path(
    post,
    path = "/records",
    tag = "records",
    request_body = PhoneRecordRequest,
    responses(
        (status = 201, description = "Record created", body = PhoneRecordResponse),
        (status = 400, description = "Blank fields, malformed body or invalid phone number", body = ErrorBody),
        (status = 409, description = "Phone number already stored", body = ErrorBody),
        (status = 502, description = "Validation provider failure", body = ErrorBody)
    )
)]
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PhoneRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PhoneRecordResponse>), AppError> {
    tracing::info!("POST /records - Creating phone record");

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::RequestValidationError(rejection.body_text())
    })?;
    request.validate()?;

    let created = state
        .records
        .create(&request.name, &request.phone_number)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /records
///
/// Lists every stored record.
#[utoipa::path(
    get,
    path = "/records",
    tag = "records",
    responses(
        (status = 200, description = "All records", body = [PhoneRecordResponse])
    )
)]
pub async fn list_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PhoneRecordResponse>>, AppError> {
    tracing::info!("GET /records - Fetching all phone records");
    let records = state.records.list_all().await?;
    Ok(Json(records))
}

/// GET /records/:id
#[utoipa::path(
    get,
    path = "/records/{id}",
    tag = "records",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "The record", body = PhoneRecordResponse),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 404, description = "No record with this id", body = ErrorBody)
    )
)]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PhoneRecordResponse>, AppError> {
    let Path(id) =
        id.map_err(|rejection| AppError::RequestValidationError(rejection.body_text()))?;
    tracing::info!("GET /records/{} - Fetching phone record", id);

    let record = state.records.get_by_id(id).await?;
    Ok(Json(record))
}
