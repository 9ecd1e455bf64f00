//! Retry and backoff policy for link checks
//!
//! One policy run resolves one URL to exactly one outcome. Each attempt
//! holds a permit from the shared concurrency limiter only while its request
//! is in flight; backoff waits happen without a permit.

use crate::checker::{CheckOutcome, ErrorKind};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Server statuses worth another attempt
const TRANSIENT_STATUSES: &[u16] = &[502, 503, 504];

/// Timeout, retry count and exponential delay for a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent retry
    pub retry_delay: Duration,

    /// Budget for a single attempt
    pub timeout: Duration,
}

/// Progress of one URL through the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// 1-based number of the attempt about to run
    pub attempt: u32,

    /// Delay to wait if this attempt fails transiently
    pub delay: Duration,
}

impl RetryState {
    fn new(initial_delay: Duration) -> Self {
        Self {
            attempt: 1,
            delay: initial_delay,
        }
    }

    fn advance(&mut self) {
        self.attempt += 1;
        self.delay = self.delay.saturating_mul(2);
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration, timeout: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
            timeout,
        }
    }

    /// Total attempts allowed, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay waited after the given failed attempt (1-based)
    ///
    /// `retry_delay`, then twice that, then four times, and so on.
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.retry_delay.saturating_mul(1u32 << exponent)
    }

    /// Returns true if the outcome should be retried
    ///
    /// Every transport error is transient, as are 502/503/504. Any other
    /// status code, 404 included, is definitive.
    pub fn is_transient(outcome: &CheckOutcome) -> bool {
        match outcome {
            CheckOutcome::Error(_) => true,
            CheckOutcome::Status { code, .. } => TRANSIENT_STATUSES.contains(code),
        }
    }

    /// Runs `attempt` until it yields a definitive outcome or attempts run out
    ///
    /// Each attempt acquires a permit from `limiter` before it starts and
    /// releases it when it finishes, fails or times out. An attempt that
    /// exceeds `timeout` is abandoned and counts as a `Timeout`.
    ///
    /// Returns the last outcome and the number of attempts made.
    pub async fn run<F, Fut>(&self, limiter: &Semaphore, mut attempt: F) -> (CheckOutcome, u32)
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = CheckOutcome>,
    {
        let mut state = RetryState::new(self.retry_delay);

        loop {
            let outcome = {
                let _permit = match limiter.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return (CheckOutcome::Error(ErrorKind::Other), state.attempt),
                };

                match tokio::time::timeout(self.timeout, attempt(state.attempt)).await {
                    Ok(outcome) => outcome,
                    Err(_) => CheckOutcome::Error(ErrorKind::Timeout),
                }
            };

            if !Self::is_transient(&outcome) || state.attempt >= self.max_attempts() {
                return (outcome, state.attempt);
            }

            tracing::debug!(
                "Attempt {}/{} failed ({:?}), retrying in {:?}",
                state.attempt,
                self.max_attempts(),
                outcome,
                state.delay
            );

            tokio::time::sleep(state.delay).await;
            state.advance();
        }
    }
}
