//! Randomized exponential backoff.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;
use crate::error::{ChatprepError, Result};

/// Wait before retry number `attempt` (0-based).
///
/// Uniform in `[min, min(max, min * 2^attempt)]`.
pub fn backoff_delay<R: Rng + ?Sized>(config: &RetryConfig, attempt: u32, rng: &mut R) -> Duration {
    let min = config.min_backoff_ms;
    let ceiling = min
        .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
        .min(config.max_backoff_ms)
        .max(min);

    let ms = if ceiling == min {
        min
    } else {
        rng.gen_range(min..=ceiling)
    };
    Duration::from_millis(ms)
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
///
/// `op` receives the 0-based attempt number.
///
/// # Errors
///
/// Non-retryable errors are returned as-is. When every attempt fails with a
/// retryable error the result is [`ChatprepError::RetriesExhausted`].
pub fn retry_with_backoff<T, F>(config: &RetryConfig, what: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let attempts = config.max_attempts.max(1);
    let mut rng = rand::thread_rng();
    let mut last_error = String::new();

    for attempt in 0..attempts {
        match op(attempt) {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(what, attempt = attempt + 1, "call recovered after retry");
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                last_error = e.to_string();
                if attempt + 1 < attempts {
                    let wait = backoff_delay(config, attempt, &mut rng);
                    tracing::warn!(
                        what,
                        attempt = attempt + 1,
                        backoff_ms = wait.as_millis() as u64,
                        error = %e,
                        "call failed, retrying"
                    );
                    std::thread::sleep(wait);
                }
            }
        }
    }

    Err(ChatprepError::RetriesExhausted {
        attempts,
        last_error,
    })
}
