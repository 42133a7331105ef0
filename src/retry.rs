//! Budgeted retry with exponential backoff
//!
//! A single combinator drives every retried network operation in the harness.
//! The policy is parameterized by a backoff curve, a wall-clock budget and a
//! predicate that separates terminal failures (give up immediately) from
//! transient ones (back off and try again).

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Retry configuration with jitter and an overall wall-clock budget.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Base backoff delay in milliseconds
    pub base_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
    /// Jitter factor (0.0 to 1.0) - adds randomness to backoff
    pub jitter_factor: f64,
    /// Overall budget for the operation including all retries
    pub overall_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_backoff_ms: 250,
            max_backoff_ms: 8_000,
            multiplier: 2.0,
            jitter_factor: 0.2,
            overall_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Calculate backoff delay for a given attempt (0-indexed)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let exp_backoff = (self.base_backoff_ms as f64) * self.multiplier.powi(attempt as i32);
        let capped_backoff = exp_backoff.min(self.max_backoff_ms as f64);

        // Jitter prevents synchronized retries against shared infrastructure
        let final_backoff = if self.jitter_factor > 0.0 {
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        Duration::from_millis(final_backoff as u64)
    }
}

/// Outcome of an exhausted or aborted retry loop.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The predicate flagged the failure as terminal; no further attempts were made.
    #[error("terminal failure: {0}")]
    Terminal(E),
    /// The wall-clock budget ran out before an attempt succeeded.
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    DeadlineExceeded { attempts: u32, last: E },
}

/// Retry an async operation under a wall-clock budget.
///
/// Failures for which `is_terminal` returns true abort the loop immediately.
/// All other failures back off exponentially (with jitter) and retry until
/// the policy's overall timeout is exhausted. Backoff sleeps never extend
/// past the deadline: if the next delay would cross it, the loop gives up
/// instead of sleeping through the budget.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation_name: &str,
    policy: &RetryPolicy,
    is_terminal: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let deadline = start + policy.overall_timeout;
    let mut attempts: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempts > 0 {
                    debug!(
                        operation = operation_name,
                        attempts = attempts + 1,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(err) => {
                attempts += 1;

                if is_terminal(&err) {
                    warn!(
                        operation = operation_name,
                        error = %err,
                        "Terminal failure, not retrying"
                    );
                    return Err(RetryError::Terminal(err));
                }

                let now = Instant::now();
                let backoff = policy.calculate_backoff(attempts - 1);
                if now >= deadline || now + backoff >= deadline {
                    warn!(
                        operation = operation_name,
                        attempts,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        error = %err,
                        "Retry budget exhausted"
                    );
                    return Err(RetryError::DeadlineExceeded { attempts, last: err });
                }

                warn!(
                    operation = operation_name,
                    attempt = attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Transient failure, backing off before retry"
                );
                sleep(backoff).await;
            }
        }
    }
}
