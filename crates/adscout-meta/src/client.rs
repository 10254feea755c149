//! HTTP client for the Ad Library `ads_archive` endpoint.
//!
//! Wraps `reqwest` with access-token handling, query construction, error
//! status mapping, and retry. Multi-page traversal lives in [`AdPager`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::MetaError;
use crate::pager::AdPager;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{AdQuery, AdsPage, AD_FIELDS, SEARCH_TYPE};

const DEFAULT_ENDPOINT: &str = "https://graph.facebook.com/v23.0/ads_archive";
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Error bodies are cut to this many characters before they land in a
/// [`MetaError::Api`].
const ERROR_BODY_LIMIT: usize = 300;

/// Client for the Ad Library API.
///
/// Use [`MetaClient::new`] for production or [`MetaClient::with_endpoint`]
/// to point at a mock server in tests.
pub struct MetaClient {
    client: Client,
    access_token: String,
    endpoint: Url,
    page_size: u32,
    retry: RetryPolicy,
}

impl MetaClient {
    /// Creates a client pointed at the production `ads_archive` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::MissingAccessToken`] if `access_token` is blank,
    /// or [`MetaError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(access_token: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, MetaError> {
        Self::with_endpoint(access_token, timeout_secs, user_agent, DEFAULT_ENDPOINT)
    }

    /// Creates a client with a custom `ads_archive` endpoint URL.
    ///
    /// The token check happens first, so a missing token is reported without
    /// any network activity.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::MissingAccessToken`] if `access_token` is blank,
    /// [`MetaError::InvalidUrl`] if `endpoint` does not parse, or
    /// [`MetaError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn with_endpoint(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        endpoint: &str,
    ) -> Result<Self, MetaError> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(MetaError::MissingAccessToken);
        }

        let endpoint = Url::parse(endpoint).map_err(|e| MetaError::InvalidUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            endpoint,
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
        })
    }

    /// Sets the `limit` sent with the first request.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Starts a paginated search. No request is sent until the returned
    /// pager is polled.
    #[must_use]
    pub fn search_ads(&self, query: &AdQuery) -> AdPager<'_> {
        if query.since.is_some() || query.until.is_some() {
            tracing::debug!(
                since = ?query.since,
                until = ?query.until,
                "date bounds are not applied as Ad Library filters"
            );
        }
        AdPager::new(self, self.build_search_url(query).into())
    }

    /// Builds the first-page URL with every search parameter percent-encoded.
    fn build_search_url(&self, query: &AdQuery) -> Url {
        let countries =
            serde_json::to_string(&query.countries).unwrap_or_else(|_| "[]".to_owned());
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.access_token);
            pairs.append_pair("limit", &self.page_size.to_string());
            pairs.append_pair("fields", &AD_FIELDS.join(","));
            pairs.append_pair("ad_reached_countries", &countries);
            pairs.append_pair("ad_type", adscout_core::AD_TYPE);
            pairs.append_pair("ad_active_status", query.status.as_str());
            pairs.append_pair("search_terms", query.terms.as_deref().unwrap_or(""));
            pairs.append_pair("search_type", SEARCH_TYPE);
        }
        url
    }

    /// Fetches one page, retrying API error statuses per the retry policy.
    pub(crate) async fn fetch_page(&self, url: &Url) -> Result<AdsPage, MetaError> {
        retry_with_backoff(&self.retry, || self.request_page(url)).await
    }

    /// Sends a single GET and maps the response.
    ///
    /// URLs carry the access token, so transport errors are stripped of
    /// their URL before they are logged or returned.
    async fn request_page(&self, url: &Url) -> Result<AdsPage, MetaError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MetaError::Http(e.without_url()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(MetaError::Api {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| MetaError::Http(e.without_url()))?;
        serde_json::from_str(&body).map_err(|e| MetaError::Deserialize {
            context: format!("ads_archive page from {}", url.path()),
            source: e,
        })
    }
}

fn truncate_body(text: &str) -> String {
    text.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
