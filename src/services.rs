use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{NewPhoneRecord, PhoneRecordResponse};
use crate::store::RecordStore;
use crate::validation_client::PhoneValidationClient;

/// Record creation workflow and read operations.
///
/// Holds no mutable state of its own; cloning shares the store and client.
#[derive(Clone)]
pub struct PhoneRecordService {
    store: Arc<dyn RecordStore>,
    validator: PhoneValidationClient,
}

impl PhoneRecordService {
    pub fn new(store: Arc<dyn RecordStore>, validator: PhoneValidationClient) -> Self {
        Self { store, validator }
    }

    /// Whether creates will consult the external validation provider.
    pub fn validation_active(&self) -> bool {
        self.validator.is_active()
    }

    /// Creates a record after a duplicate check and external validation.
    ///
    /// The duplicate check is a fast path only. Two concurrent creates with
    /// the same number can both pass it, in which case the store rejects the
    /// second insert with the same `DuplicatePhoneNumber` error.
    ///
    /// # Errors
    ///
    /// * `AppError::DuplicatePhoneNumber` if the number is already stored.
    /// * `AppError::InvalidPhoneNumber` / `AppError::ValidationServiceError`
    ///   from the validation client, unchanged.
    pub async fn create(
        &self,
        name: &str,
        phone_number: &str,
    ) -> Result<PhoneRecordResponse, AppError> {
        tracing::info!("Creating phone record for: {}", name);

        if let Some(existing) = self.store.find_by_phone_number(phone_number).await? {
            tracing::warn!(
                "Phone number {} already exists with ID: {}",
                phone_number,
                existing.id
            );
            return Err(AppError::DuplicatePhoneNumber {
                phone_number: phone_number.to_string(),
                existing_id: existing.id,
            });
        }

        let validation = self.validator.validate(phone_number).await?;

        let saved = self
            .store
            .insert(NewPhoneRecord {
                name: name.to_string(),
                phone_number: phone_number.to_string(),
                country: validation.country_code,
            })
            .await?;

        tracing::info!("Phone record created successfully with id: {}", saved.id);
        Ok(saved.into())
    }

    pub async fn list_all(&self) -> Result<Vec<PhoneRecordResponse>, AppError> {
        tracing::info!("Fetching all phone records");
        let records = self.store.find_all().await?;
        Ok(records.into_iter().map(PhoneRecordResponse::from).collect())
    }

    /// # Errors
    ///
    /// `AppError::RecordNotFound` when no record has this id.
    pub async fn get_by_id(&self, id: i64) -> Result<PhoneRecordResponse, AppError> {
        tracing::info!("Fetching phone record with id: {}", id);
        self.store
            .find_by_id(id)
            .await?
            .map(PhoneRecordResponse::from)
            .ok_or(AppError::RecordNotFound(id))
    }
}
