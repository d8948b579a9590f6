// shop/src/db.rs

//! Connection pool construction and schema bootstrap for the SQLite store.

use crate::errors::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Opens a pool for `database_url` and applies the embedded migrations.
///
/// In-memory databases only exist for as long as their connection does, so they
/// are pinned to a single connection that is never reaped.
#[instrument(name = "db::connect", skip(database_url), err(Display))]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
  let connect_options = SqliteConnectOptions::from_str(database_url)
    .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)))?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(Duration::from_secs(5));

  let pool = if is_in_memory(database_url) {
    SqlitePoolOptions::new()
      .min_connections(1)
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(connect_options)
      .await?
  } else {
    SqlitePoolOptions::new()
      .max_connections(max_connections)
      .connect_with(connect_options)
      .await?
  };

  migrate(&pool).await?;
  info!(in_memory = is_in_memory(database_url), "Database ready.");
  Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
  database_url.contains(":memory:") || database_url.contains("mode=memory")
}
