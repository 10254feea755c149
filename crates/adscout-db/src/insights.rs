//! Database operations for `insights`, append-only model annotations on ads.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `insights` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRow {
    pub id: i64,
    pub ad_id: String,
    pub model: String,
    pub payload_json: String,
    pub created_utc: DateTime<Utc>,
}

/// Appends an annotation for `ad_id` and returns the new row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including when `ad_id` does
/// not reference a stored ad.
pub async fn insert_insight(
    pool: &SqlitePool,
    ad_id: &str,
    model: &str,
    payload: &serde_json::Value,
) -> Result<i64, DbError> {
    let payload_json = serde_json::to_string(payload)?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO insights (ad_id, model, payload_json, created_utc) \
         VALUES (?1, ?2, ?3, ?4) \
         RETURNING id",
    )
    .bind(ad_id)
    .bind(model)
    .bind(&payload_json)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Lists an ad's annotations, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_insights_for_ad(
    pool: &SqlitePool,
    ad_id: &str,
) -> Result<Vec<InsightRow>, DbError> {
    let rows = sqlx::query_as::<_, InsightRow>(
        "SELECT id, ad_id, model, payload_json, created_utc \
         FROM insights \
         WHERE ad_id = ?1 \
         ORDER BY id",
    )
    .bind(ad_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
