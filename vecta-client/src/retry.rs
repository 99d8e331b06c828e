/// Transport retry policy
///
/// Only network failures and 5xx responses are re-sent. Usage errors and 4xx
/// responses come back from the first attempt.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;
use vecta_core::{Error, Result};

/// How the HTTP transport re-sends requests that failed with a retryable error.
///
/// Delays double after each re-send, starting at `base_delay_ms` and capped at
/// `max_delay_ms`. Builders never re-send on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Re-sends after the first attempt
    pub retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            retries,
            base_delay_ms: base_delay.as_millis() as u64,
            max_delay_ms: max_delay.as_millis() as u64,
        }
    }

    /// Send once, never re-send. The client default.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// A few quick re-sends for a local server restarting.
    pub fn fast() -> Self {
        Self::new(3, Duration::from_millis(10), Duration::from_millis(100))
    }

    /// Re-sends spread over several seconds for a remote server.
    pub fn standard() -> Self {
        Self::new(5, Duration::from_millis(100), Duration::from_secs(5))
    }

    pub fn is_enabled(&self) -> bool {
        self.retries > 0
    }

    /// Delay before re-send number `retry` (0 for the first re-send).
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let delay = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::no_retry()
    }
}

/// Runs `operation`, retrying errors that `Error::is_retryable()` accepts.
///
/// Non-retryable errors (usage errors, 4xx responses) are returned at once.
pub async fn retry_with_policy<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error: Option<Error> = None;

    for attempt in 0..=policy.retries {
        if attempt > 0 {
            let backoff = policy.backoff_duration(attempt - 1);
            if let Some(e) = &last_error {
                warn!(attempt, backoff_ms = backoff.as_millis() as u64, error = %e, "retrying request");
            }
            tokio::time::sleep(backoff).await;
        }

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() => last_error = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Network("retry exhausted without error".to_string())))
}
