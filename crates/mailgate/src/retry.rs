//! Bounded polling for event-status checks.
//!
//! Every attempt is followed by a full `interval` pause, whatever its
//! outcome, so a poll that succeeds on attempt `n` takes at least
//! `n * interval`.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Outcome of a single polling attempt.
#[derive(Debug)]
pub enum Attempt {
    /// The condition was observed; stop polling.
    Success,
    /// Not observed yet; try again. Carries the error when the connection
    /// was reset.
    RetryableFailure(Option<Error>),
    /// Unrecoverable error; stop polling and report it.
    FatalFailure(Error),
}

impl From<Result<bool>> for Attempt {
    fn from(outcome: Result<bool>) -> Self {
        match outcome {
            Ok(true) => Self::Success,
            Ok(false) => Self::RetryableFailure(None),
            Err(e) if e.is_connection_reset() => Self::RetryableFailure(Some(e)),
            Err(e) => Self::FatalFailure(e),
        }
    }
}

/// Attempt budget and pause for polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts.
    pub limit: u32,
    /// Pause after each attempt.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Creates a new policy.
    #[must_use]
    pub const fn new(limit: u32, interval: Duration) -> Self {
        Self { limit, interval }
    }

    /// Runs `check` until it reports `true` or the budget runs out.
    ///
    /// Returns `Ok(true)` on the first success and `Ok(false)` once `limit`
    /// attempts have come back negative. Connection resets count as a
    /// negative attempt.
    ///
    /// # Errors
    ///
    /// Returns the first error from `check` that is not a connection reset.
    pub async fn poll<F, Fut>(&self, mut check: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        for attempt in 1..=self.limit {
            let attempt_result = Attempt::from(check().await);
            tokio::time::sleep(self.interval).await;

            match attempt_result {
                Attempt::Success => {
                    tracing::info!(attempt, "Poll condition reached");
                    return Ok(true);
                }
                Attempt::RetryableFailure(None) => {}
                Attempt::RetryableFailure(Some(e)) => {
                    tracing::warn!(
                        attempt,
                        limit = self.limit,
                        error = %e,
                        "Connection reset, retrying"
                    );
                }
                Attempt::FatalFailure(e) => return Err(e),
            }
        }

        tracing::debug!(limit = self.limit, "Retry budget exhausted");
        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    const INTERVAL: Duration = Duration::from_secs(5);

    fn reset() -> Error {
        Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
    }

    #[test]
    fn test_classification() {
        assert!(matches!(Attempt::from(Ok(true)), Attempt::Success));
        assert!(matches!(Attempt::from(Ok(false)), Attempt::RetryableFailure(None)));
        assert!(matches!(
            Attempt::from(Err(reset())),
            Attempt::RetryableFailure(Some(ref e)) if e.is_connection_reset()
        ));
        assert!(matches!(
            Attempt::from(Err(Error::api_error(500, "boom"))),
            Attempt::FatalFailure(Error::Api { status: 500, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = RetryPolicy::new(5, INTERVAL)
            .poll(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(true) }
            })
            .await
            .unwrap();

        assert!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The pause after a successful attempt is still taken.
        assert!(start.elapsed() >= INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = RetryPolicy::new(5, INTERVAL)
            .poll(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(false) }
            })
            .await
            .unwrap();

        assert!(!result);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(start.elapsed() >= INTERVAL * 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_reset_is_retried() {
        let calls = AtomicU32::new(0);

        let result = RetryPolicy::new(5, INTERVAL)
            .poll(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    match n {
                        2 => Err(reset()),
                        3 => Ok(true),
                        _ => Ok(false),
                    }
                }
            })
            .await
            .unwrap();

        assert!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_reset_consumes_one_attempt() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = RetryPolicy::new(5, INTERVAL)
            .poll(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 2 {
                        Err(reset())
                    } else {
                        Ok(false)
                    }
                }
            })
            .await
            .unwrap();

        assert!(!result);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(start.elapsed() >= INTERVAL * 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_stops_polling() {
        let calls = AtomicU32::new(0);

        let result = RetryPolicy::new(5, INTERVAL)
            .poll(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::api_error(401, "Forbidden")) }
            })
            .await;

        assert!(matches!(result, Err(Error::Api { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
