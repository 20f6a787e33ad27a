//! Retry logic with exponential backoff
//!
//! Wraps every distinct API call (one page of issues, one page of comments)
//! in configurable retry logic. Transient failures back off exponentially
//! with optional jitter; permanent failures short-circuit on the first
//! attempt.

use crate::config::RetryConfig;
use crate::error::Error;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (server overload, rate limiting, network blip) should
/// return `true`. Permanent failures (bad request, not found, auth failure,
/// durable-write failure) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // DNS, connect, reset, timeout. Builder errors are programming
            // mistakes, not network weather.
            Error::Transport(e) => !e.is_builder(),
            // HTTP 5xx and 429
            Error::TransientApi { .. } => true,
            // HTTP 4xx other than 429: the server already told us why
            Error::PermanentApi { .. } => false,
            // Store failures abort the run rather than being papered over
            Error::Database(_) => false,
            Error::InvalidRepository(_) => false,
            Error::Serialization(_) => false,
            Error::InvalidUrl(_) => false,
            Error::Io(_) => false,
            Error::Cancelled => false,
        }
    }
}

/// Execute an async operation with exponential backoff retry logic
///
/// `max_attempts` bounds the total number of attempts including the
/// initial one, so the attempt counter stays auditable: an upstream that
/// always fails is hit exactly `max_attempts` times. The delay is applied
/// only before a retried attempt, never after the final one; on exhaustion
/// the last transient error is returned to the caller.
pub async fn request_with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut attempt = 1;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "request succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                attempt += 1;

                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis(),
                    "request failed, retrying"
                );

                let jittered_delay = if config.jitter {
                    add_jitter(delay)
                } else {
                    delay
                };

                tokio::time::sleep(jittered_delay).await;

                let next_delay =
                    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier);
                delay = next_delay.min(config.max_delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "request failed after all retry attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "request failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}

/// Add random jitter to a delay to prevent thundering herd
///
/// Jitter is uniformly distributed between 0% and 100% of the delay, so the
/// actual delay falls between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    let jittered_secs = delay.as_secs_f64() * (1.0 + jitter_factor);
    Duration::from_secs_f64(jittered_secs)
}
