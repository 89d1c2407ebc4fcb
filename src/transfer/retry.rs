//! Retry configuration, delay calculation, and the shared retry loop.
//!
//! Every retried operation goes through [`with_retry()`], which consults
//! [`HuginnError::is_transient()`] to decide between another attempt and
//! returning the error, keeping retry logic in a single place.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::cancel::CancellationFlag;
use crate::telemetry;
use crate::{HuginnError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff: attempt `k` (counted from 1) that fails is
/// followed by a sleep of `min_backoff * 2^(k-1)`, capped at `max_backoff`.
///
/// ```rust
/// # use huginn::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .min_backoff(Duration::from_millis(200));
/// assert_eq!(config.delay_for_attempt(3), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 4.
    pub max_attempts: u32,
    /// Delay after the first failed attempt. Default: 1s.
    pub min_backoff: Duration,
    /// Maximum delay between attempts. Default: 60s.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Create a new config with defaults (4 attempts, 1s, 2s, 4s).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request). Clamped to 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the delay after the first failed attempt.
    pub fn min_backoff(mut self, delay: Duration) -> Self {
        self.min_backoff = delay;
        self
    }

    /// Set the maximum delay between attempts.
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Delay after failed attempt number `attempt` (counted from 1).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let delay = self
            .min_backoff
            .saturating_mul(2u32.saturating_pow(exponent));
        delay.min(self.max_backoff)
    }
}

/// Execute an async operation with retry logic.
///
/// Transient errors are retried up to `config.max_attempts` with exponential
/// backoff; the error of the final attempt is returned as-is. Permanent
/// errors are returned immediately. Cancellation is checked before every
/// attempt.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation: &str,
    cancel: &CancellationFlag,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        cancel.check()?;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempt < config.max_attempts => {
                metrics::counter!(telemetry::RETRIES_TOTAL, "operation" => operation.to_owned())
                    .increment(1);
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                cancel.or_cancelled(tokio::time::sleep(delay)).await?;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delays_double_from_min_backoff() {
        let config = RetryConfig::new();
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn delay_is_capped() {
        let config = RetryConfig::new().max_backoff(Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn max_attempts_never_zero() {
        assert_eq!(RetryConfig::new().max_attempts(0).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&RetryConfig::new(), "test", &CancellationFlag::new(), || {
            calls.fetch_add(1, Ordering::Relaxed);
            async { Err(HuginnError::Unauthorized { status: 401 }) }
        })
        .await;

        assert!(matches!(result, Err(HuginnError::Unauthorized { status: 401 })));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn last_error_is_surfaced() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&RetryConfig::new(), "test", &CancellationFlag::new(), || {
            let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
            async move { Err(HuginnError::InvalidResponse(format!("attempt {n}"))) }
        })
        .await;

        match result {
            Err(HuginnError::InvalidResponse(msg)) => assert_eq!(msg, "attempt 4"),
            other => panic!("expected last InvalidResponse, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn cancelled_before_first_attempt() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&RetryConfig::new(), "test", &cancel, || {
            calls.fetch_add(1, Ordering::Relaxed);
            async { Ok(()) }
        })
        .await;

        assert!(matches!(result, Err(HuginnError::Cancelled)));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
