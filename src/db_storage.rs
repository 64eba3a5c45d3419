use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::{AppError, ResultExt};
use crate::models::{NewPhoneRecord, PhoneRecord};
use crate::store::RecordStore;

const RECORD_COLUMNS: &str = "id, name, phone_number, country, created_at, updated_at";

/// Postgres-backed [`RecordStore`].
///
/// Uniqueness is enforced by the `uk_phone_number` constraint; a violation at
/// insert time is reported as a duplicate of the row that won the race.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<PhoneRecord>, AppError> {
        sqlx::query_as::<_, PhoneRecord>(&format!(
            "SELECT {} FROM phone_records WHERE phone_number = $1",
            RECORD_COLUMNS
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("find phone record by number {}", phone_number))
    }

    async fn exists_by_phone_number(&self, phone_number: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM phone_records WHERE phone_number = $1)",
        )
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await
        .context("check phone number existence")?;

        Ok(exists)
    }

    async fn insert(&self, record: NewPhoneRecord) -> Result<PhoneRecord, AppError> {
        let inserted = sqlx::query_as::<_, PhoneRecord>(&format!(
            "INSERT INTO phone_records (name, phone_number, country, created_at, updated_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(&record.name)
        .bind(&record.phone_number)
        .bind(&record.country)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(stored) => Ok(stored),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::warn!(
                    "Unique constraint hit inserting {}; resolving existing record",
                    record.phone_number
                );
                match self.find_by_phone_number(&record.phone_number).await? {
                    Some(existing) => Err(AppError::DuplicatePhoneNumber {
                        phone_number: record.phone_number,
                        existing_id: existing.id,
                    }),
                    None => Err(AppError::DatabaseError(sqlx::Error::Database(db_err))),
                }
            }
            Err(e) => Err(e).context("insert phone record"),
        }
    }

    async fn find_all(&self) -> Result<Vec<PhoneRecord>, AppError> {
        sqlx::query_as::<_, PhoneRecord>(&format!(
            "SELECT {} FROM phone_records ORDER BY id ASC",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("list phone records")
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhoneRecord>, AppError> {
        sqlx::query_as::<_, PhoneRecord>(&format!(
            "SELECT {} FROM phone_records WHERE id = $1",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("find phone record {}", id))
    }
}
