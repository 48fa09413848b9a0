//! Timeout + retry wrapper shared by C2/C3/C5 call sites.
//!
//! Simplified from the teacher's circuit-breaker (`vex_llm::resilient_provider`):
//! the spec's failure semantics are "skip the item after exhausting
//! retries," not "stop calling the provider for a cooldown window," so a
//! persistent open/half-open circuit isn't needed here.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::provider::ProviderError;

/// Per-call timeout and retry budget (spec.md §5 defaults: 60s, 3 retries).
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

/// Run `attempt` up to `policy.max_retries + 1` times, each bounded by
/// `policy.timeout`. Returns the first success, or the last error once
/// the retry budget is exhausted.
pub async fn with_retry<F, Fut, T>(policy: CallPolicy, label: &str, mut attempt: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut last_err = ProviderError::Unavailable(format!("{label}: no attempts made"));

    for try_num in 0..=policy.max_retries {
        match tokio::time::timeout(policy.timeout, attempt()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => {
                warn!(call = label, attempt = try_num, error = %e, "call failed");
                last_err = e;
            }
            Err(_) => {
                warn!(call = label, attempt = try_num, timeout = ?policy.timeout, "call timed out");
                last_err = ProviderError::Timeout(policy.timeout);
            }
        }
    }

    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry_on_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_retry(CallPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ProviderError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let policy = CallPolicy { timeout: Duration::from_millis(50), max_retries: 3 };
        let result = with_retry(policy, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ProviderError::RequestFailed("transient".into()))
                } else {
                    Ok(1)
                }
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_retries_and_returns_last_error() {
        let policy = CallPolicy { timeout: Duration::from_millis(20), max_retries: 2 };
        let result: Result<(), _> = with_retry(policy, "test", || async {
            Err(ProviderError::RequestFailed("always fails".into()))
        })
        .await;
        assert!(result.is_err());
    }
}
