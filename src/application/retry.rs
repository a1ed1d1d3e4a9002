//! Fixed-schedule retry for provider calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::ports::AIError;

/// Retry schedule for transient provider failures.
///
/// Delays are taken from a precomputed list indexed by retry number, not
/// computed exponentially and never jittered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delays: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delays: Vec<Duration>) -> Self {
        Self {
            max_retries,
            delays,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.max_retries, config.retry_delays())
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based). Past the end of the
    /// schedule the last delay is reused.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let index = retry.saturating_sub(1) as usize;
        self.delays
            .get(index)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Runs `operation`, retrying retryable failures per the schedule.
    ///
    /// Non-retryable errors are returned immediately; after the last retry
    /// the final error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, AIError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AIError>>,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay_for(retry);
                    tracing::debug!(
                        retry,
                        max_retries = self.max_retries,
                        status = ?err.status(),
                        delay_ms = delay.as_millis() as u64,
                        "retrying provider call"
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            3,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    mod schedule {
        use super::*;

        #[test]
        fn default_schedule_is_one_two_four_seconds() {
            let policy = RetryPolicy::default();
            assert_eq!(policy.max_retries(), 3);
            assert_eq!(policy.delay_for(1), Duration::from_secs(1));
            assert_eq!(policy.delay_for(2), Duration::from_secs(2));
            assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        }

        #[test]
        fn delay_past_schedule_reuses_last() {
            let policy = RetryPolicy::new(5, vec![Duration::from_millis(10), Duration::from_millis(30)]);
            assert_eq!(policy.delay_for(4), Duration::from_millis(30));
        }

        #[test]
        fn empty_schedule_means_no_delay() {
            assert_eq!(RetryPolicy::none().delay_for(1), Duration::ZERO);
        }

        #[test]
        fn from_config_uses_configured_values() {
            let config = LlmConfig {
                max_retries: 1,
                retry_delays_ms: vec![250],
                ..Default::default()
            };
            let policy = RetryPolicy::from_config(&config);
            assert_eq!(policy, RetryPolicy::new(1, vec![Duration::from_millis(250)]));
        }
    }

    mod run {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn retries_transient_failures_on_schedule() {
            let attempts = AtomicU32::new(0);
            let start = Instant::now();

            let result = RetryPolicy::default()
                .run(|| async {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(AIError::api(503, "busy"))
                    } else {
                        Ok(n)
                    }
                })
                .await;

            assert_eq!(result, Ok(2));
            assert_eq!(attempts.load(Ordering::SeqCst), 3);
            assert_eq!(start.elapsed(), Duration::from_secs(3));
        }

        #[tokio::test(start_paused = true)]
        async fn gives_up_after_max_retries() {
            let attempts = AtomicU32::new(0);

            let result: Result<(), AIError> = RetryPolicy::default()
                .run(|| async {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AIError::api(429, "slow down"))
                })
                .await;

            assert_eq!(result.unwrap_err().status(), Some(429));
            assert_eq!(attempts.load(Ordering::SeqCst), 4);
        }

        #[tokio::test(start_paused = true)]
        async fn non_retryable_failure_is_returned_immediately() {
            let attempts = AtomicU32::new(0);
            let start = Instant::now();

            let result: Result<(), AIError> = RetryPolicy::default()
                .run(|| async {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AIError::api(400, "bad request"))
                })
                .await;

            assert!(result.is_err());
            assert_eq!(attempts.load(Ordering::SeqCst), 1);
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }
}
