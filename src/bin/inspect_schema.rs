//! Utility to print the layout of the `phone_records` table.

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Main entry point for the schema inspection utility.
///
/// Connects to the database and lists the columns and constraints of `phone_records`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = env::var("DB_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("DB_URL or DATABASE_URL must be set"))?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let columns: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT column_name, data_type, is_nullable FROM information_schema.columns
         WHERE table_name = 'phone_records' ORDER BY ordinal_position",
    )
    .fetch_all(&pool)
    .await?;

    if columns.is_empty() {
        tracing::warn!("Table phone_records not found; start the server once to create it");
        return Ok(());
    }

    tracing::info!("phone_records columns:");
    for (column, data_type, nullable) in &columns {
        tracing::info!("  - {}: {} (nullable: {})", column, data_type, nullable);
    }

    let constraints: Vec<(String, String)> = sqlx::query_as(
        "SELECT constraint_name, constraint_type FROM information_schema.table_constraints
         WHERE table_name = 'phone_records' ORDER BY constraint_name",
    )
    .fetch_all(&pool)
    .await?;

    tracing::info!("phone_records constraints:");
    for (name, kind) in constraints {
        tracing::info!("  - {} ({})", name, kind);
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM phone_records")
        .fetch_one(&pool)
        .await?;
    tracing::info!("{} record(s) stored", count);

    Ok(())
}
