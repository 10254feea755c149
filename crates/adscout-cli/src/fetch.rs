//! `fetch` command: stream Ad Library results into the store.

use std::pin::pin;

use adscout_core::{ActiveStatus, AppConfig};
use adscout_meta::{AdQuery, MetaClient, RetryPolicy};
use anyhow::Context;
use chrono::NaiveDate;
use futures::StreamExt;
use sqlx::SqlitePool;

const PROGRESS_EVERY: usize = 100;

/// Normalizes CLI arguments into a search query. Blank country codes and a
/// blank keyword are dropped.
pub(crate) fn build_query(
    countries: Vec<String>,
    terms: Option<String>,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    status: ActiveStatus,
) -> AdQuery {
    AdQuery {
        countries: countries
            .into_iter()
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .collect(),
        terms: terms.filter(|t| !t.trim().is_empty()),
        since,
        until,
        status,
    }
}

fn build_client(config: &AppConfig) -> anyhow::Result<MetaClient> {
    let token = config.meta_access_token.as_deref().unwrap_or_default();
    let client = MetaClient::with_endpoint(
        token,
        config.http_timeout_secs,
        &config.user_agent,
        &config.ads_archive_url(),
    )
    .context("failed to build Ad Library client (is META_ACCESS_TOKEN set?)")?;

    Ok(client
        .with_page_size(config.page_size)
        .with_retry_policy(RetryPolicy {
            max_attempts: config.max_attempts,
            base_delay: std::time::Duration::from_secs(config.retry_base_secs),
            max_delay: std::time::Duration::from_secs(config.retry_max_delay_secs),
        }))
}

/// Builds the client from configuration and runs [`ingest`].
///
/// # Errors
///
/// Returns an error if the access token is missing, if a page fails after
/// all retries, or if a database write fails.
pub(crate) async fn run_fetch(
    pool: &SqlitePool,
    config: &AppConfig,
    query: &AdQuery,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let saved = ingest(pool, &client, query).await?;
    println!("Done. Saved {saved} ads.");
    Ok(())
}

/// Upserts every record the search yields and returns how many were saved.
///
/// Records without an id are logged and skipped. The first API or database
/// error aborts the run; ads saved before it stay committed.
pub(crate) async fn ingest(
    pool: &SqlitePool,
    client: &MetaClient,
    query: &AdQuery,
) -> anyhow::Result<usize> {
    tracing::info!(
        countries = ?query.countries,
        terms = query.terms.as_deref().unwrap_or(""),
        status = %query.status,
        "starting Ad Library fetch"
    );

    let mut records = pin!(client.search_ads(query).into_stream());
    let mut saved: usize = 0;
    let mut skipped: usize = 0;

    while let Some(record) = records.next().await {
        let record = record.context("Ad Library request failed")?;

        match adscout_db::upsert_ad(pool, &record).await {
            Ok(_) => {}
            Err(adscout_db::DbError::MissingAdId) => {
                skipped += 1;
                tracing::warn!(
                    page_name = record.page_name.as_deref().unwrap_or(""),
                    "skipping ad without id"
                );
                continue;
            }
            Err(e) => return Err(e).context("failed to store ad"),
        }

        saved += 1;
        if saved % PROGRESS_EVERY == 0 {
            println!("...{saved} ads saved");
        }
    }

    tracing::info!(saved, skipped, "Ad Library fetch complete");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn build_query_trims_countries_and_drops_blank_terms() {
        let query = build_query(
            vec![" BE".to_owned(), String::new(), "NL ".to_owned()],
            Some("  ".to_owned()),
            None,
            None,
            ActiveStatus::All,
        );

        assert_eq!(query.countries, vec!["BE", "NL"]);
        assert!(query.terms.is_none());
        assert_eq!(query.status, ActiveStatus::All);
    }

    #[tokio::test]
    async fn ingest_saves_ads_and_skips_records_without_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v23.0/ads_archive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "1", "ad_creative_bodies": ["a", "b"] },
                    { "page_name": "no id" },
                    { "id": 2 }
                ]
            })))
            .mount(&server)
            .await;

        let pool = adscout_db::connect_in_memory().await.expect("pool");
        let client = MetaClient::with_endpoint(
            "token",
            5,
            "adscout-test",
            &format!("{}/v23.0/ads_archive", server.uri()),
        )
        .expect("client")
        .with_retry_policy(RetryPolicy::immediate(1));

        let query = build_query(vec!["BE".to_owned()], None, None, None, ActiveStatus::Active);
        let saved = ingest(&pool, &client, &query).await.expect("ingest");

        assert_eq!(saved, 2);
        assert_eq!(adscout_db::count_ads(&pool).await.expect("count"), 2);
        assert_eq!(
            adscout_db::count_creatives_for_ad(&pool, "1")
                .await
                .expect("count"),
            2
        );
        assert!(adscout_db::get_ad(&pool, "2").await.expect("query").is_some());
    }

    #[test]
    fn missing_token_fails_client_construction() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_owned(),
            log_level: "info".to_owned(),
            meta_access_token: None,
            meta_api_version: "v23.0".to_owned(),
            meta_api_base_url: "https://graph.facebook.com".to_owned(),
            http_timeout_secs: 60,
            user_agent: "adscout-test".to_owned(),
            page_size: 100,
            max_attempts: 5,
            retry_base_secs: 1,
            retry_max_delay_secs: 30,
            db_max_connections: 1,
            db_acquire_timeout_secs: 10,
        };
        let Err(err) = build_client(&config) else {
            panic!("client construction must fail without a token");
        };
        assert!(err.to_string().contains("META_ACCESS_TOKEN"));
    }
}
