//! Persistence abstraction for phone records.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{NewPhoneRecord, PhoneRecord};

/// Storage capabilities needed by the record workflow.
///
/// Implementations must enforce phone number uniqueness at `insert` and
/// report a violation as [`AppError::DuplicatePhoneNumber`]. Each call is its
/// own unit of atomicity.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Looks up the record owning `phone_number`, if any.
    async fn find_by_phone_number(&self, phone_number: &str)
        -> Result<Option<PhoneRecord>, AppError>;

    /// Returns true when some record owns `phone_number`.
    async fn exists_by_phone_number(&self, phone_number: &str) -> Result<bool, AppError> {
        Ok(self.find_by_phone_number(phone_number).await?.is_some())
    }

    /// Persists a new record, assigning its id and timestamps.
    async fn insert(&self, record: NewPhoneRecord) -> Result<PhoneRecord, AppError>;

    /// Every stored record, ordered by ascending id.
    async fn find_all(&self) -> Result<Vec<PhoneRecord>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PhoneRecord>, AppError>;
}

/// In-process store backed by a vector.
///
/// Ids start at 1 and increase monotonically.
#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: Vec<PhoneRecord>,
    last_id: i64,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneRecord>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .find(|r| r.phone_number == phone_number)
            .cloned())
    }

    async fn insert(&self, record: NewPhoneRecord) -> Result<PhoneRecord, AppError> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .records
            .iter()
            .find(|r| r.phone_number == record.phone_number)
        {
            return Err(AppError::DuplicatePhoneNumber {
                phone_number: record.phone_number,
                existing_id: existing.id,
            });
        }

        inner.last_id += 1;
        let now = Utc::now();
        let stored = PhoneRecord {
            id: inner.last_id,
            name: record.name,
            phone_number: record.phone_number,
            country: Some(record.country),
            created_at: now,
            updated_at: now,
        };
        inner.records.push(stored.clone());

        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<PhoneRecord>, AppError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhoneRecord>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }
}
