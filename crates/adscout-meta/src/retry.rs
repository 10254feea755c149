//! Retry with exponential back-off for Ad Library page requests.
//!
//! [`retry_with_backoff`] wraps one page request and retries it when the API
//! answered with an error status. Transport, URL, and decoding failures are
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::MetaError;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// How many times a page request is attempted and how long to wait between
/// attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each following retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately, for tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Sleep before retry number `retry` (1-based).
    ///
    /// | Retry | Delay (base 1 s, cap 30 s) |
    /// |-------|----------------------------|
    /// | 1     | 1 s                        |
    /// | 2     | 2 s                        |
    /// | 3     | 4 s                        |
    /// | 4     | 8 s                        |
    /// | 5     | 16 s                       |
    /// | 6+    | 30 s                       |
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(20);
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Only [`MetaError::Api`] qualifies. Everything else (missing token, bad
/// URL, transport failure, malformed body) is returned to the caller as is.
pub(crate) fn is_retriable(err: &MetaError) -> bool {
    matches!(err, MetaError::Api { .. })
}

/// Runs `operation` up to `policy.max_attempts` times while it fails with a
/// retriable error, sleeping [`RetryPolicy::delay_for`] between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, MetaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MetaError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Ad Library request failed; retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
