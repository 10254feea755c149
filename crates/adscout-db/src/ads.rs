//! Database operations for `ads` and the creative set replaced alongside each
//! upsert.

use adscout_core::{AdRecord, AD_TYPE};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::creatives::replace_creatives;
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `ads` table.
///
/// The `*_json` columns hold compact JSON string arrays; `raw_json` is the
/// untouched API payload.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdRow {
    pub ad_id: String,
    pub page_id: Option<String>,
    pub page_name: Option<String>,
    pub ad_creation_time: Option<String>,
    pub ad_delivery_start_time: Option<String>,
    pub ad_delivery_stop_time: Option<String>,
    pub ad_snapshot_url: Option<String>,
    pub languages_json: String,
    pub publisher_platforms_json: String,
    pub ad_type: Option<String>,
    pub countries_json: String,
    pub raw_json: String,
    /// Set once when the ad is first stored.
    pub first_seen_utc: DateTime<Utc>,
    /// Bumped on every re-fetch.
    pub last_seen_utc: DateTime<Utc>,
    pub active_status: Option<String>,
}

impl AdRow {
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        decode_json_list(&self.languages_json)
    }

    #[must_use]
    pub fn publisher_platforms(&self) -> Vec<String> {
        decode_json_list(&self.publisher_platforms_json)
    }

    #[must_use]
    pub fn countries(&self) -> Vec<String> {
        decode_json_list(&self.countries_json)
    }
}

/// Decodes a stored JSON string array. Anything that is not one reads as empty.
pub(crate) fn decode_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

const AD_COLUMNS: &str = "ad_id, page_id, page_name, ad_creation_time, ad_delivery_start_time, \
     ad_delivery_stop_time, ad_snapshot_url, languages_json, publisher_platforms_json, ad_type, \
     countries_json, raw_json, first_seen_utc, last_seen_utc, active_status";

// ---------------------------------------------------------------------------
// ads operations
// ---------------------------------------------------------------------------

/// Upserts an ad seen now. See [`upsert_ad_at`].
///
/// # Errors
///
/// Same as [`upsert_ad_at`].
pub async fn upsert_ad(pool: &SqlitePool, record: &AdRecord) -> Result<usize, DbError> {
    upsert_ad_at(pool, record, Utc::now()).await
}

/// Reconciles one API record with stored state in a single transaction.
///
/// The ad row is inserted, or on conflict every column except `ad_id` and
/// `first_seen_utc` is overwritten. The ad's creatives are then deleted and
/// re-inserted from [`AdRecord::creative_variants`]. Returns the number of
/// creative rows written.
///
/// # Errors
///
/// Returns [`DbError::MissingAdId`] if the record has no id, or
/// [`DbError::Sqlx`] if any statement fails (nothing is committed).
pub async fn upsert_ad_at(
    pool: &SqlitePool,
    record: &AdRecord,
    seen_at: DateTime<Utc>,
) -> Result<usize, DbError> {
    let ad_id = record
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(DbError::MissingAdId)?;

    let languages_json = serde_json::to_string(&record.languages)?;
    let platforms_json = serde_json::to_string(&record.publisher_platforms)?;
    let countries_json = serde_json::to_string(&record.ad_reached_countries)?;
    let raw_json = serde_json::to_string(&record.raw)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO ads (ad_id, page_id, page_name, ad_creation_time, \
             ad_delivery_start_time, ad_delivery_stop_time, ad_snapshot_url, \
             languages_json, publisher_platforms_json, ad_type, countries_json, \
             raw_json, first_seen_utc, last_seen_utc, active_status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13, ?14) \
         ON CONFLICT (ad_id) DO UPDATE SET \
             page_id                  = excluded.page_id, \
             page_name                = excluded.page_name, \
             ad_creation_time         = excluded.ad_creation_time, \
             ad_delivery_start_time   = excluded.ad_delivery_start_time, \
             ad_delivery_stop_time    = excluded.ad_delivery_stop_time, \
             ad_snapshot_url          = excluded.ad_snapshot_url, \
             languages_json           = excluded.languages_json, \
             publisher_platforms_json = excluded.publisher_platforms_json, \
             ad_type                  = excluded.ad_type, \
             countries_json           = excluded.countries_json, \
             raw_json                 = excluded.raw_json, \
             last_seen_utc            = excluded.last_seen_utc, \
             active_status            = excluded.active_status",
    )
    .bind(ad_id)
    .bind(record.page_id.as_deref())
    .bind(record.page_name.as_deref())
    .bind(record.ad_creation_time.as_deref())
    .bind(record.ad_delivery_start_time.as_deref())
    .bind(record.ad_delivery_stop_time.as_deref())
    .bind(record.ad_snapshot_url.as_deref())
    .bind(&languages_json)
    .bind(&platforms_json)
    .bind(AD_TYPE)
    .bind(&countries_json)
    .bind(&raw_json)
    .bind(seen_at)
    .bind(record.active_status())
    .execute(&mut *tx)
    .await?;

    let variants = record.creative_variants();
    replace_creatives(&mut *tx, ad_id, &variants).await?;

    tx.commit().await?;

    tracing::debug!(ad_id, creatives = variants.len(), "upserted ad");

    Ok(variants.len())
}

/// Fetches one ad by its Ad Library id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_ad(pool: &SqlitePool, ad_id: &str) -> Result<Option<AdRow>, DbError> {
    let row = sqlx::query_as::<_, AdRow>(&format!(
        "SELECT {AD_COLUMNS} FROM ads WHERE ad_id = ?1"
    ))
    .bind(ad_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists every stored ad in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ads(pool: &SqlitePool) -> Result<Vec<AdRow>, DbError> {
    let rows = sqlx::query_as::<_, AdRow>(&format!(
        "SELECT {AD_COLUMNS} FROM ads ORDER BY rowid"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_ads(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ads")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_json_list_tolerates_garbage() {
        assert_eq!(
            decode_json_list(r#"["facebook","instagram"]"#),
            vec!["facebook", "instagram"]
        );
        assert!(decode_json_list("[]").is_empty());
        assert!(decode_json_list("not json").is_empty());
        assert!(decode_json_list(r#"{"a":1}"#).is_empty());
    }
}
