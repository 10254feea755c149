//! Read side of the flat report: one row per ad, joined with its first
//! creative and its score.

use sqlx::SqlitePool;

use crate::ads::decode_json_list;
use crate::DbError;

/// One report line before formatting.
///
/// `title` and `body` come from the ad's lowest-id creative. `score` is
/// `None` for ads that have not been scored yet.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExportRow {
    pub ad_id: String,
    pub page_name: Option<String>,
    pub ad_delivery_start_time: Option<String>,
    pub ad_delivery_stop_time: Option<String>,
    pub publisher_platforms_json: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub score: Option<f64>,
    pub ad_snapshot_url: Option<String>,
}

impl ExportRow {
    #[must_use]
    pub fn publisher_platforms(&self) -> Vec<String> {
        decode_json_list(&self.publisher_platforms_json)
    }
}

/// Reads every ad in insertion order for export.
///
/// The read runs inside a transaction so the report reflects one consistent
/// snapshot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_export_rows(pool: &SqlitePool) -> Result<Vec<ExportRow>, DbError> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query_as::<_, ExportRow>(
        "SELECT a.ad_id, a.page_name, a.ad_delivery_start_time, a.ad_delivery_stop_time, \
                a.publisher_platforms_json, c.link_title AS title, c.body, s.score, \
                a.ad_snapshot_url \
         FROM ads a \
         LEFT JOIN creatives c \
                ON c.id = (SELECT MIN(id) FROM creatives WHERE ad_id = a.ad_id) \
         LEFT JOIN scores s ON s.ad_id = a.ad_id \
         ORDER BY a.rowid",
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(rows)
}
