use sqlx::{postgres::PgPoolOptions, PgPool};

/// Idempotent bootstrap for the records table.
const CREATE_PHONE_RECORDS: &str = r#"
    CREATE TABLE IF NOT EXISTS phone_records (
        id           BIGSERIAL PRIMARY KEY,
        name         TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        country      TEXT,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT uk_phone_number UNIQUE (phone_number)
    )
"#;

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Creates the `phone_records` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(CREATE_PHONE_RECORDS).execute(&self.pool).await?;
        tracing::info!("phone_records table ready");
        Ok(())
    }
}
