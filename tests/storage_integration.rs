use std::env;

use phone_records_api::data::db::Database;
use phone_records_api::data::db_storage::PgRecordStore;
use phone_records_api::errors::AppError;
use phone_records_api::models::NewPhoneRecord;
use phone_records_api::store::RecordStore;

/// Integration smoke test for the Postgres record store.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn pg_record_store_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url, 2).await?;
    db.ensure_schema().await?;
    let store = PgRecordStore::new(db.pool.clone());

    // Use a unique number to avoid conflicts on repeated runs.
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let number = format!("+1999{}", nanos % 10_000_000_000);

    let stored = store
        .insert(NewPhoneRecord {
            name: "Smoke Test".to_string(),
            phone_number: number.clone(),
            country: "US".to_string(),
        })
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    assert!(stored.id > 0);
    assert_eq!(stored.country.as_deref(), Some("US"));
    assert!(store.exists_by_phone_number(&number).await.map_err(|e| anyhow::anyhow!(e.to_string()))?);

    let fetched = store
        .find_by_id(stored.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(fetched, Some(stored.clone()));

    // The unique constraint must surface as a duplicate of the stored row
    let second = store
        .insert(NewPhoneRecord {
            name: "Second".to_string(),
            phone_number: number.clone(),
            country: "US".to_string(),
        })
        .await;
    match second {
        Err(AppError::DuplicatePhoneNumber { existing_id, .. }) => assert_eq!(existing_id, stored.id),
        other => anyhow::bail!("expected duplicate, got {:?}", other),
    }

    let all = store
        .find_all()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(all.iter().any(|r| r.id == stored.id));
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    Ok(())
}
