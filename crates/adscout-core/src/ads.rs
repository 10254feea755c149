//! Ad records as returned by the Ad Library `ads_archive` endpoint.
//!
//! The API shape is loose: fields may be missing, `null`, or (for ids) numeric
//! instead of string. [`AdRecord`] keeps every field optional and coerces
//! scalars to strings so that a single odd record does not abort a fetch run.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::CoreError;

/// Ad type requested from the API and recorded on every stored ad.
pub const AD_TYPE: &str = "ALL";

/// Delivery-status filter accepted by the `ad_active_status` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveStatus {
    #[default]
    Active,
    Inactive,
    All,
}

impl ActiveStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveStatus::Active => "ACTIVE",
            ActiveStatus::Inactive => "INACTIVE",
            ActiveStatus::All => "ALL",
        }
    }
}

impl fmt::Display for ActiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(ActiveStatus::Active),
            "INACTIVE" => Ok(ActiveStatus::Inactive),
            "ALL" => Ok(ActiveStatus::All),
            _ => Err(CoreError::InvalidActiveStatus(s.to_string())),
        }
    }
}

/// One ad as returned by the API, with every field optional.
///
/// Build it with [`AdRecord::from_value`] so that the untouched payload is
/// kept in [`AdRecord::raw`] for storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub page_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub page_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_creation_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_delivery_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_delivery_stop_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_snapshot_url: Option<String>,
    /// Not part of the requested field list, but stored when the API sends it.
    #[serde(default, deserialize_with = "lenient_string")]
    pub ad_active_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub publisher_platforms: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ad_reached_countries: Vec<String>,
    /// Creative arrays are positional: a `null` entry stays in place as `None`.
    #[serde(default, deserialize_with = "lenient_slots")]
    pub ad_creative_bodies: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_slots")]
    pub ad_creative_link_titles: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_slots")]
    pub ad_creative_link_descriptions: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_slots")]
    pub ad_creative_link_captions: Vec<Option<String>>,
    #[serde(skip)]
    pub raw: Value,
}

/// One positional creative variant assembled from the four parallel
/// `ad_creative_*` arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreativeVariant {
    pub body: Option<String>,
    pub link_title: Option<String>,
    pub link_desc: Option<String>,
    pub link_caption: Option<String>,
}

impl AdRecord {
    /// Parses a raw API item, keeping the original JSON alongside the typed
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if `raw` is not a JSON object.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        // Derived visitors also accept sequences; an array must not map
        // positionally onto the fields.
        if !raw.is_object() {
            return Err(de::Error::invalid_type(unexpected(&raw), &"an ad object"));
        }
        let mut record: AdRecord = serde_json::from_value(raw.clone())?;
        record.raw = raw;
        Ok(record)
    }

    /// Active status recorded for this ad; `ACTIVE` when the API omits it.
    #[must_use]
    pub fn active_status(&self) -> &str {
        self.ad_active_status
            .as_deref()
            .unwrap_or(ActiveStatus::Active.as_str())
    }

    /// Zips the creative arrays by position.
    ///
    /// Produces `max(len)` variants, padding shorter arrays with `None`. An ad
    /// with no creative text at all still yields one empty variant so that
    /// every stored ad has at least one creative row.
    #[must_use]
    pub fn creative_variants(&self) -> Vec<CreativeVariant> {
        let arrays = [
            &self.ad_creative_bodies,
            &self.ad_creative_link_titles,
            &self.ad_creative_link_descriptions,
            &self.ad_creative_link_captions,
        ];
        let count = arrays.iter().map(|a| a.len()).max().unwrap_or(0).max(1);

        (0..count)
            .map(|i| CreativeVariant {
                body: self.ad_creative_bodies.get(i).cloned().flatten(),
                link_title: self.ad_creative_link_titles.get(i).cloned().flatten(),
                link_desc: self.ad_creative_link_descriptions.get(i).cloned().flatten(),
                link_caption: self.ad_creative_link_captions.get(i).cloned().flatten(),
            })
            .collect()
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}

fn coerce_scalar(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_scalar))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().filter_map(coerce_scalar).collect(),
        // A bare scalar where a list was expected: keep it as a single entry.
        Some(other) => coerce_scalar(other).into_iter().collect(),
    })
}

/// Like [`lenient_list`] but keeps one slot per array entry, so parallel
/// arrays stay aligned by index.
fn lenient_slots<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().map(coerce_scalar).collect(),
        Some(other) => vec![coerce_scalar(other)],
    })
}
