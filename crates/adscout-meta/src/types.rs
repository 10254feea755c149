//! Ad Library request and response types.

use adscout_core::ActiveStatus;
use chrono::NaiveDate;
use serde::Deserialize;

/// Fields requested for every ad. The API returns only what is listed here.
pub const AD_FIELDS: &[&str] = &[
    "id",
    "page_id",
    "page_name",
    "ad_creation_time",
    "ad_delivery_start_time",
    "ad_delivery_stop_time",
    "ad_snapshot_url",
    "ad_creative_bodies",
    "ad_creative_link_titles",
    "ad_creative_link_descriptions",
    "ad_creative_link_captions",
    "languages",
    "publisher_platforms",
];

pub const SEARCH_TYPE: &str = "KEYWORD_UNORDERED";

/// Search parameters for one fetch run.
#[derive(Debug, Clone, Default)]
pub struct AdQuery {
    /// ISO country codes, e.g. `["BE", "NL"]`.
    pub countries: Vec<String>,
    /// Keyword search; sent as an empty string when absent.
    pub terms: Option<String>,
    /// Accepted for the CLI surface but not sent to the API.
    pub since: Option<NaiveDate>,
    /// Accepted for the CLI surface but not sent to the API.
    pub until: Option<NaiveDate>,
    pub status: ActiveStatus,
}

/// One page of `ads_archive` results: `{ "data": [...], "paging": {...} }`.
///
/// Items stay as raw JSON here; [`adscout_core::AdRecord::from_value`] types
/// them while keeping the original payload.
#[derive(Debug, Deserialize)]
pub struct AdsPage {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    /// Fully-formed URL of the next page, query string included.
    #[serde(default)]
    pub next: Option<String>,
}

impl AdsPage {
    /// The continuation URL, if the API reported one.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}
