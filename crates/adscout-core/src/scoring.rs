//! Heuristic desirability score for stored ads.
//!
//! Long-running ads, ads with many creative variants, and ads placed on many
//! publisher platforms score higher. Each component is normalized to
//! `[0, 1]` against a cap, then weighted. The weights sum to `0.70`, so the
//! maximum reachable score is `0.70`.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Version tag written next to every score row.
pub const SCORE_VERSION: &str = "v1";

/// Timestamp layout used by the Ad Library, e.g. `2024-01-01T00:00:00+0000`.
pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub const DURATION_WEIGHT: f64 = 0.35;
pub const CREATIVE_WEIGHT: f64 = 0.20;
pub const PLATFORM_WEIGHT: f64 = 0.15;

const DURATION_CAP_DAYS: f64 = 90.0;
const CREATIVE_CAP: f64 = 5.0;
const PLATFORM_CAP: f64 = 3.0;

/// Stored attributes the score is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub delivery_start: Option<&'a str>,
    pub delivery_stop: Option<&'a str>,
    pub platforms: &'a [String],
    pub creative_count: usize,
}

/// Component values and the weighted total, serialized into `components_json`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub duration_days: i64,
    pub duration_norm: f64,
    pub creative_norm: f64,
    pub platform_norm: f64,
    pub score: f64,
}

/// Parses an Ad Library timestamp, returning `None` when it does not match
/// [`API_TIMESTAMP_FORMAT`].
#[must_use]
pub fn parse_api_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw.trim(), API_TIMESTAMP_FORMAT).ok()
}

/// Whole days an ad ran (or has been running as of `now`).
///
/// A missing or unparseable start yields `0`. A missing or unparseable stop
/// is treated as `now`. Negative spans clamp to `0`.
#[must_use]
pub fn duration_days(start: Option<&str>, stop: Option<&str>, now: DateTime<Utc>) -> i64 {
    let Some(start) = start.and_then(parse_api_timestamp) else {
        return 0;
    };
    let stop = stop
        .and_then(parse_api_timestamp)
        .map_or(now, |s| s.with_timezone(&Utc));

    (stop - start.with_timezone(&Utc)).num_days().max(0)
}

fn capped_ratio(value: f64, cap: f64) -> f64 {
    (value / cap).min(1.0)
}

/// Computes the score for one ad.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_ad(inputs: &ScoreInputs<'_>, now: DateTime<Utc>) -> ScoreBreakdown {
    let duration_days = duration_days(inputs.delivery_start, inputs.delivery_stop, now);
    let duration_norm = capped_ratio(duration_days as f64, DURATION_CAP_DAYS);

    let distinct_platforms: HashSet<&str> =
        inputs.platforms.iter().map(String::as_str).collect();
    let platform_norm = capped_ratio(distinct_platforms.len() as f64, PLATFORM_CAP);

    let creative_norm = capped_ratio(inputs.creative_count as f64, CREATIVE_CAP);

    let score = DURATION_WEIGHT * duration_norm
        + CREATIVE_WEIGHT * creative_norm
        + PLATFORM_WEIGHT * platform_norm;

    ScoreBreakdown {
        duration_days,
        duration_norm,
        creative_norm,
        platform_norm,
        score,
    }
}
