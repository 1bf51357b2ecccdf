//! Retry support for transient DailyMed API failures.
//!
//! Every outgoing request is wrapped in [`with_retry`], which re-runs the
//! operation with exponential backoff as long as the returned error is
//! classified as transient by [`RetryableError`].

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

/// Classifies errors into transient failures worth retrying and permanent
/// ones that must surface immediately.
pub trait RetryableError {
    /// Whether a retry has a chance of succeeding.
    fn is_retryable(&self) -> bool;

    /// Short human-readable reason used in retry log lines.
    fn retry_reason(&self) -> &str;
}

/// Backoff policy applied to retried requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry; doubles on every further attempt.
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Policy that never retries. Useful in tests that assert on the first
    /// response.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is exhausted.
pub(crate) async fn with_retry<T, E, F, Fut>(
    operation: F,
    config: &RetryConfig,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    // First retry waits base_delay, then the delay doubles per attempt.
    let factor = (config.base_delay.as_millis() as u64 / 2).max(1);
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(factor)
        .max_delay(config.max_delay)
        .map(jitter)
        .take(config.max_retries);

    RetryIf::spawn(strategy, operation, |error: &E| {
        let retry = error.is_retryable();
        if retry {
            warn!(
                error = %error,
                reason = error.retry_reason(),
                "{} failed, retrying",
                operation_name
            );
        }
        retry
    })
    .await
}
