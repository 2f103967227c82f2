//! Shared retry-with-backoff loop, used by every stage agent rather than
//! duplicated per backend (spec §4.1: "up to 3 attempts... exponential
//! backoff `1s x 2^(attempt-1) + random[0,1)s`").

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::LlmError;

pub const MAX_ATTEMPTS: u32 = 3;

fn backoff_for_attempt(attempt: u32) -> Duration {
    let base_secs = 2f64.powi(attempt as i32 - 1);
    let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
    Duration::from_secs_f64(base_secs + jitter)
}

/// Runs `call` up to `MAX_ATTEMPTS` times, sleeping between attempts with
/// exponential backoff plus jitter, and stops early on a non-retryable
/// error.
pub async fn retry_with_backoff<F, Fut, T>(operation: &str, mut call: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut last_error = None;
    for attempt in 1..=MAX_ATTEMPTS {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() {
                    return Err(err);
                }
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    error = %err,
                    "backend call failed, retrying"
                );
                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(backoff_for_attempt(attempt)).await;
                }
                last_error = Some(err);
            }
        }
    }
    Err(last_error.unwrap_or(LlmError::Unavailable(operation.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_immediately_without_retry() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, LlmError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stops_immediately_on_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, LlmError> = retry_with_backoff("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Api("bad request".to_string()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_up_to_max_attempts_on_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, LlmError> = retry_with_backoff("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::Timeout)
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff("test", || async {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                Err(LlmError::Timeout)
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }
}
