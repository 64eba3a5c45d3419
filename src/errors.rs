use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::ErrorBody;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// A record with the same phone number already exists.
    DuplicatePhoneNumber {
        /// The conflicting phone number.
        phone_number: String,
        /// Id of the record that already owns the number.
        existing_id: i64,
    },
    /// No record exists with the requested id.
    RecordNotFound(i64),
    /// The validation provider rejected the phone number.
    InvalidPhoneNumber {
        /// The rejected phone number.
        phone_number: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The validation provider failed or could not be reached.
    ValidationServiceError(String),
    /// Malformed or incomplete request input.
    RequestValidationError(String),
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// Stable machine-readable kind reported in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DuplicatePhoneNumber { .. } => "duplicate_phone_number",
            AppError::RecordNotFound(_) => "record_not_found",
            AppError::InvalidPhoneNumber { .. } => "invalid_phone_number",
            AppError::ValidationServiceError(_) => "validation_service_error",
            AppError::RequestValidationError(_) => "request_validation_error",
            AppError::DatabaseError(_) => "database_error",
            AppError::WithContext { source, .. } => source.kind(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicatePhoneNumber { .. } => StatusCode::CONFLICT,
            AppError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidPhoneNumber { .. } => StatusCode::BAD_REQUEST,
            AppError::ValidationServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::RequestValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::WithContext { source, .. } => source.status_code(),
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DuplicatePhoneNumber {
                phone_number,
                existing_id,
            } => write!(
                f,
                "Phone number '{}' already exists with ID: {}",
                phone_number, existing_id
            ),
            AppError::RecordNotFound(id) => write!(f, "Phone record not found with id: {}", id),
            AppError::InvalidPhoneNumber {
                phone_number,
                reason,
            } => write!(f, "Invalid phone number: {}. Reason: {}", phone_number, reason),
            AppError::ValidationServiceError(msg) => write!(f, "{}", msg),
            AppError::RequestValidationError(msg) => write!(f, "{}", msg),
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
            phone_number: None,
            existing_id: None,
            id: None,
        };

        match self {
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return source.into_response();
            }
            AppError::DuplicatePhoneNumber {
                phone_number,
                existing_id,
            } => {
                body.phone_number = Some(phone_number);
                body.existing_id = Some(existing_id);
            }
            AppError::RecordNotFound(id) => body.id = Some(id),
            AppError::InvalidPhoneNumber { .. } | AppError::RequestValidationError(_) => {}
            AppError::ValidationServiceError(_) => {
                tracing::error!("Phone validation service error: {}", body.message);
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                body.message = "Database error".to_string();
            }
        }

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    ///
    /// Transport failures always surface as validation service errors.
    fn from(err: reqwest::Error) -> Self {
        AppError::ValidationServiceError(format!(
            "Unable to reach phone validation service: {}",
            err
        ))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

/// Extension for sqlx::Error to add context
impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: f(),
        })
    }
}
