//! Database operations for `creatives`.

use adscout_core::CreativeVariant;
use sqlx::{SqliteConnection, SqlitePool};

use crate::DbError;

/// A row from the `creatives` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreativeRow {
    pub id: i64,
    pub ad_id: String,
    pub body: Option<String>,
    pub link_title: Option<String>,
    pub link_desc: Option<String>,
    pub link_caption: Option<String>,
}

/// Deletes the ad's creatives and inserts `variants` in order.
///
/// Runs on the caller's connection so it joins the caller's transaction.
pub(crate) async fn replace_creatives(
    conn: &mut SqliteConnection,
    ad_id: &str,
    variants: &[CreativeVariant],
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM creatives WHERE ad_id = ?1")
        .bind(ad_id)
        .execute(&mut *conn)
        .await?;

    for variant in variants {
        sqlx::query(
            "INSERT INTO creatives (ad_id, body, link_title, link_desc, link_caption) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(ad_id)
        .bind(variant.body.as_deref())
        .bind(variant.link_title.as_deref())
        .bind(variant.link_desc.as_deref())
        .bind(variant.link_caption.as_deref())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Lists an ad's creatives in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_creatives_for_ad(
    pool: &SqlitePool,
    ad_id: &str,
) -> Result<Vec<CreativeRow>, DbError> {
    let rows = sqlx::query_as::<_, CreativeRow>(
        "SELECT id, ad_id, body, link_title, link_desc, link_caption \
         FROM creatives \
         WHERE ad_id = ?1 \
         ORDER BY id",
    )
    .bind(ad_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_creatives_for_ad(pool: &SqlitePool, ad_id: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM creatives WHERE ad_id = ?1")
        .bind(ad_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
