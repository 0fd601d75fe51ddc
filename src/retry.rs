//! Bounded exponential-backoff retry policy.
//!
//! Used by the publish flow: each channel message is retried up to the
//! attempt cap, and exhaustion is surfaced as an error rather than
//! swallowed.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::PublishError;

/// Retry schedule: `max_attempts` tries with delays doubling from
/// `base_delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay before the retry following failed attempt `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(2))
    }
}

/// Run `op` under the policy until it succeeds or attempts are exhausted.
///
/// Returns [`PublishError::RetriesExhausted`] carrying the last failure
/// after the final attempt.
pub async fn retry_publish<F, Fut>(policy: RetryPolicy, mut op: F) -> Result<(), PublishError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), PublishError>>,
{
    let mut last_error = String::new();

    for attempt in 0..policy.max_attempts {
        match op().await {
            Ok(()) => return Ok(()),
            Err(e) => {
                last_error = e.to_string();
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    delay_secs = delay.as_secs_f64(),
                    error = %e,
                    "publish attempt failed"
                );
                if attempt + 1 < policy.max_attempts {
                    sleep(delay).await;
                }
            }
        }
    }

    Err(PublishError::RetriesExhausted {
        attempts: policy.max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio_test::assert_ok;

    #[test]
    fn delays_double_per_attempt() {
        let policy = RetryPolicy::new(10, Duration::from_secs(2));
        assert_eq!(policy.delay_for(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(16));
    }

    #[tokio::test]
    async fn succeeds_before_exhaustion() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::ZERO);

        let result = retry_publish(policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(PublishError::Send("flaky".into()))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        tokio_test::assert_ok!(result);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_reports_last_error() {
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = retry_publish(policy, || async {
            Err(PublishError::Send("down".into()))
        })
        .await;

        match result {
            Err(PublishError::RetriesExhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("down"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
