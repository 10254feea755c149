//! Page-by-page traversal of an `ads_archive` search.
//!
//! Each call to [`AdPager::next_page`] sends at most one request (plus its
//! retries). A caller that stops polling never triggers further requests.

use adscout_core::AdRecord;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Url;

use crate::client::MetaClient;
use crate::error::MetaError;

/// Cursor over the pages of one search.
///
/// The first URL is built from the query; every later URL is the API's
/// `paging.next` value, requested verbatim because it already embeds its own
/// parameters. After an error the pager is exhausted.
pub struct AdPager<'a> {
    client: &'a MetaClient,
    next: Option<String>,
    pages_fetched: usize,
}

impl<'a> AdPager<'a> {
    pub(crate) fn new(client: &'a MetaClient, first_url: String) -> Self {
        Self {
            client,
            next: Some(first_url),
            pages_fetched: 0,
        }
    }

    /// Number of pages successfully fetched so far.
    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// `true` once the last page has been fetched or an error ended the search.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Fetches the next page and returns its records, or `None` when the
    /// search is exhausted.
    ///
    /// Items that are not JSON objects are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`MetaError`] that survives the retry policy. The
    /// pager yields `None` on every call after that.
    pub async fn next_page(&mut self) -> Result<Option<Vec<AdRecord>>, MetaError> {
        let Some(raw_url) = self.next.take() else {
            return Ok(None);
        };
        let url = Url::parse(&raw_url).map_err(|e| MetaError::InvalidUrl {
            // Continuation URLs embed the access token; keep them out of errors.
            url: "paging.next".to_owned(),
            reason: e.to_string(),
        })?;

        let page = self.client.fetch_page(&url).await?;
        self.pages_fetched += 1;
        self.next = page.next_url().map(str::to_owned);

        let total = page.data.len();
        let records: Vec<AdRecord> = page
            .data
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                AdRecord::from_value(item)
                    .map_err(|e| {
                        tracing::warn!(
                            page = self.pages_fetched,
                            index,
                            error = %e,
                            "skipping malformed ad record"
                        );
                    })
                    .ok()
            })
            .collect();

        tracing::debug!(
            page = self.pages_fetched,
            records = records.len(),
            skipped = total - records.len(),
            has_next = self.next.is_some(),
            "fetched Ad Library page"
        );

        Ok(Some(records))
    }

    /// Flattens the remaining pages into a stream of records.
    ///
    /// The stream ends after the last page or right after yielding the first
    /// error.
    pub fn into_stream(self) -> impl Stream<Item = Result<AdRecord, MetaError>> + 'a {
        stream::try_unfold(self, |mut pager| async move {
            let page = pager.next_page().await?;
            Ok::<_, MetaError>(page.map(|records| {
                (
                    stream::iter(records.into_iter().map(Ok::<AdRecord, MetaError>)),
                    pager,
                )
            }))
        })
        .try_flatten()
    }
}
