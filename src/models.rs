use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::errors::AppError;

/// Country reported when the provider cannot determine one.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

// ============ Database Models ============

/// A stored phone entry.
///
/// `phone_number` is unique across all records; the `uk_phone_number`
/// constraint on the `phone_records` table enforces it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PhoneRecord {
    /// Server-assigned identifier.
    pub id: i64,
    /// Name of the number's owner.
    pub name: String,
    /// Phone number, stored exactly as submitted.
    pub phone_number: String,
    /// Country code derived from validation.
    pub country: Option<String>,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: DateTime<Utc>,
}

/// A record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoneRecord {
    pub name: String,
    pub phone_number: String,
    pub country: String,
}

// ============ Validation Models ============

/// Outcome of a single call to the phone validation provider.
///
/// Never persisted; only the country code ends up on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub phone_number: String,
    pub country_code: String,
    /// Carrier name, or a note explaining why validation was skipped.
    pub carrier: String,
}

impl ValidationResult {
    /// A trivially valid result used when validation is bypassed.
    pub fn bypassed(phone_number: &str, note: &str) -> Self {
        Self {
            valid: true,
            phone_number: phone_number.to_string(),
            country_code: UNKNOWN_COUNTRY.to_string(),
            carrier: note.to_string(),
        }
    }
}

// ============ API Request/Response Models ============

/// Body of `POST /records`.
///
/// Missing fields deserialize as empty strings so that they are reported
/// through [`PhoneRecordRequest::validate`] together with blank ones.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRecordRequest {
    /// Owner name. Must not be blank.
    #[serde(default)]
    #[schema(example = "Alice")]
    pub name: String,
    /// Phone number. Must not be blank.
    #[serde(default)]
    #[schema(example = "+14155550100")]
    pub phone_number: String,
}

impl PhoneRecordRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("Name is required");
        }
        if self.phone_number.trim().is_empty() {
            problems.push("Phone number is required");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::RequestValidationError(problems.join("; ")))
        }
    }
}

/// External projection of a [`PhoneRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRecordResponse {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PhoneRecord> for PhoneRecordResponse {
    fn from(record: PhoneRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            phone_number: record.phone_number,
            country: record.country,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Machine-readable error kind, e.g. `duplicate_phone_number`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
    /// Conflicting number (duplicates only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Id of the record owning the number (duplicates only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<i64>,
    /// Requested id (not found only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}
