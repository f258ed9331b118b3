//! Bounded retry with randomised backoff, shared by every provider adapter.
//!
//! Attempts run strictly one after another. Each attempt and each backoff
//! sleep races the request's [`CancellationToken`], so a cancelled search
//! stops retrying immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Treated as at least 1.
    pub attempts: u32,
    /// Backoff range in milliseconds, inclusive.
    pub jitter_ms: (u64, u64),
}

impl RetryPolicy {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            attempts: config.retry_attempts,
            jitter_ms: config.retry_jitter_ms,
        }
    }

    /// Draw a random backoff delay from the jitter range.
    pub fn backoff(&self) -> Duration {
        let (min, max) = self.jitter_ms;
        if min >= max {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// `op` receives the 1-based attempt number. Only
/// [transient](SearchError::is_transient) errors are retried; the last
/// error is returned once the budget is exhausted.
///
/// # Errors
///
/// Returns [`SearchError::Cancelled`] as soon as `cancel` fires, or the
/// final error from `op`.
pub async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, SearchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(SearchError::Cancelled(format!("attempt {attempt} aborted")));
            }
            outcome = op(attempt) => outcome,
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < attempts => err,
            Err(err) => return Err(err),
        };

        let delay = policy.backoff();
        tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying provider call");

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(SearchError::Cancelled(format!("backoff after attempt {attempt} aborted")));
            }
            () = tokio::time::sleep(delay) => {}
        }
        attempt += 1;
    }
}
