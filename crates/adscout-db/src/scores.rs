//! Database operations for `scores`.

use adscout_core::{score_ad, ScoreInputs, SCORE_VERSION};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::ads::decode_json_list;
use crate::DbError;

/// A row from the `scores` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ScoreRow {
    pub ad_id: String,
    pub score: f64,
    /// Serialized [`adscout_core::ScoreBreakdown`].
    pub components_json: Option<String>,
    pub version: String,
}

#[derive(sqlx::FromRow)]
struct ScoringSource {
    ad_id: String,
    ad_delivery_start_time: Option<String>,
    ad_delivery_stop_time: Option<String>,
    publisher_platforms_json: String,
    creative_count: i64,
}

/// Recomputes the score of every stored ad in one transaction.
///
/// `now` stands in for a missing delivery stop time. Returns the number of
/// ads scored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails; no score is written in that
/// case.
pub async fn recompute_scores(pool: &SqlitePool, now: DateTime<Utc>) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    let sources = sqlx::query_as::<_, ScoringSource>(
        "SELECT a.ad_id, a.ad_delivery_start_time, a.ad_delivery_stop_time, \
                a.publisher_platforms_json, \
                (SELECT COUNT(*) FROM creatives c WHERE c.ad_id = a.ad_id) AS creative_count \
         FROM ads a \
         ORDER BY a.rowid",
    )
    .fetch_all(&mut *tx)
    .await?;

    for source in &sources {
        let platforms = decode_json_list(&source.publisher_platforms_json);
        let breakdown = score_ad(
            &ScoreInputs {
                delivery_start: source.ad_delivery_start_time.as_deref(),
                delivery_stop: source.ad_delivery_stop_time.as_deref(),
                platforms: &platforms,
                creative_count: usize::try_from(source.creative_count).unwrap_or(0),
            },
            now,
        );
        let components_json = serde_json::to_string(&breakdown)?;

        sqlx::query(
            "INSERT INTO scores (ad_id, score, components_json, version) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (ad_id) DO UPDATE SET \
                 score           = excluded.score, \
                 components_json = excluded.components_json, \
                 version         = excluded.version",
        )
        .bind(&source.ad_id)
        .bind(breakdown.score)
        .bind(&components_json)
        .bind(SCORE_VERSION)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(scored = sources.len(), version = SCORE_VERSION, "recomputed ad scores");

    Ok(sources.len())
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_score(pool: &SqlitePool, ad_id: &str) -> Result<Option<ScoreRow>, DbError> {
    let row = sqlx::query_as::<_, ScoreRow>(
        "SELECT ad_id, score, components_json, version FROM scores WHERE ad_id = ?1",
    )
    .bind(ad_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
