use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::{str::FromStr, time::Duration};
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/adscout-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &adscout_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("ad record has no id")]
    MissingAdId,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("failed to serialize column value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Connect to a SQLite pool, creating the database file if it does not exist.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the URL is invalid or the connection cannot be
/// established.
pub async fn connect_pool(
    database_url: &str,
    config: PoolConfig,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Open a private in-memory database with all migrations applied.
///
/// Every connection to `sqlite::memory:` is its own database, so the pool is
/// pinned to a single connection that is never recycled.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or a migration fails.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize, sqlx::migrate::MigrateError> {
    // The _sqlx_migrations table does not exist on a fresh database; treat
    // absence as zero applied.
    let applied_before: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    MIGRATOR.run(pool).await?;

    let applied_after: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn in_memory_pool_is_migrated_and_alive() {
        let pool = connect_in_memory().await.expect("in-memory pool");
        ping(&pool).await.expect("ping");
        assert_eq!(run_migrations(&pool).await.expect("re-run"), 0);
    }
}

pub mod ads;
pub mod creatives;
pub mod export;
pub mod insights;
pub mod scores;

pub use ads::{count_ads, get_ad, list_ads, upsert_ad, upsert_ad_at, AdRow};
pub use creatives::{count_creatives_for_ad, list_creatives_for_ad, CreativeRow};
pub use export::{list_export_rows, ExportRow};
pub use insights::{insert_insight, list_insights_for_ad, InsightRow};
pub use scores::{get_score, recompute_scores, ScoreRow};
