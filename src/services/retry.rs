use std::{future::Future, time::Duration};

use rand::Rng;
use tracing::warn;

use crate::error::{PlanError, Result};

/// Caller-side retry policy for backend calls.
///
/// `PlanRequestClient` never retries; wrap its `generate` call in
/// [`retry_with_backoff`] when resilience is wanted.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Add up to one extra backoff interval of random delay
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn delay_for(&self, backoff: Duration, err: &PlanError) -> Duration {
        let mut delay = backoff;
        if let PlanError::RateLimit { retry_after } = err {
            delay = delay.max(Duration::from_secs(*retry_after));
        }
        if self.jitter && !backoff.is_zero() {
            let extra = rand::rng().random_range(0..=backoff.as_millis() as u64);
            delay += Duration::from_millis(extra);
        }
        delay
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy runs out of attempts. The last error is returned as is.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    let mut backoff = policy.initial_backoff;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(backoff, &err);
                warn!(
                    target: "cinetrip::retry",
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying backend call"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                backoff = (backoff * 2).min(policy.max_backoff);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn instant_policy(max_attempts: usize) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            jitter: false,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let calls = AtomicUsize::new(0);

        let result = retry_with_backoff(&instant_policy(3), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(PlanError::http(503, "overloaded"))
            } else {
                Ok("plan")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "plan");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_hard_failures_are_not_retried() {
        let calls = AtomicUsize::new(0);

        let result: Result<()> = retry_with_backoff(&instant_policy(5), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(PlanError::MalformedResponse("not json".to_string()))
        })
        .await;

        assert!(matches!(result, Err(PlanError::MalformedResponse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicUsize::new(0);

        let result: Result<()> = retry_with_backoff(&instant_policy(2), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(PlanError::Timeout("slow".to_string()))
        })
        .await;

        assert!(matches!(result, Err(PlanError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rate_limit_delay_honors_retry_after() {
        let policy = instant_policy(3);
        let delay = policy.delay_for(
            Duration::from_millis(10),
            &PlanError::RateLimit { retry_after: 4 },
        );
        assert_eq!(delay, Duration::from_secs(4));
    }

    #[test]
    fn test_none_policy_is_single_attempt() {
        assert_eq!(RetryPolicy::none().max_attempts, 1);
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts, 1);
    }
}
