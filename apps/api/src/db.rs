use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Connections are held only for single-row status writes.
const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects to the backend's Postgres database, where document and courseware
/// records live.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to backend database...");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .context("Failed to connect to DATABASE_URL")?;

    info!("Database pool established (max {MAX_CONNECTIONS} connections)");
    Ok(pool)
}
