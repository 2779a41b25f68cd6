use std::time::Duration;

use rand::Rng;

/// Bounded retry policy for stale index writes.
///
/// Stale writes are the only retryable failure in the pipeline: the backing
/// store rejected the write because another writer landed first, and the
/// adapter re-fetches fresh state on the next attempt. Everything else
/// (timeouts, unavailability) is surfaced to the caller to decide.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff before retry number `attempt` (1-based over completed tries):
    /// `base * 2^(attempt-1)` plus up to one `base` of random jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1 << (attempt - 1).min(16));
        let jitter_micros = rand::thread_rng().gen_range(0..=self.base_delay.as_micros() as u64);
        exp + Duration::from_micros(jitter_micros)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
    }

    #[test]
    fn at_least_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn backoff_grows_exponentially() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        let first = policy.backoff(1);
        let third = policy.backoff(3);
        // Jitter adds at most one base_delay on top of the exponential part.
        assert!(first >= Duration::from_millis(100));
        assert!(first <= Duration::from_millis(200));
        assert!(third >= Duration::from_millis(400));
        assert!(third <= Duration::from_millis(500));
    }
}
