//! Backoff policy: decides how long a rate-limited job waits, and when to give up.

use std::time::Duration;

/// What to do with a job that was just rate limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Put the job back in the queue after `Duration`.
    Retry(Duration),

    /// Retry budget exhausted; abandon the job.
    GiveUp,
}

/// Exponential backoff for rate-limited jobs.
///
/// Pure: no clock, no state. Example with base=60s, max_retries=5:
/// - attempt 1 (first retry): 120s
/// - attempt 2: 240s
/// - attempt 3: 480s
/// - attempt 4: 960s
/// - attempt 5: 1920s
/// - attempt 6: give up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,

    /// Upper bound for a single wait.
    pub max_delay: Duration,

    /// Number of retries allowed after the first attempt.
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(60),
            max_delay: Duration::from_secs(60 * 60),
            max_retries: 5,
        }
    }
}

impl BackoffPolicy {
    /// Wait before retry number `attempt`: `min(base * 2^attempt, max_delay)`.
    ///
    /// `attempt` is 1 for the first retry. Saturates instead of overflowing.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }

    /// Decide the next step for a job that has been rate limited `attempt` times.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt > self.max_retries {
            RetryDecision::GiveUp
        } else {
            RetryDecision::Retry(self.delay(attempt))
        }
    }
}
