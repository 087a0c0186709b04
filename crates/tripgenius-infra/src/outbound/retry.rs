//! Bounded timeout and linear-backoff retry for outbound calls.

use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};

use tripgenius_core::ports::ProviderError;

/// Timeout ceiling for [`RetryPolicy::fail_fast`].
const FAIL_FAST_TIMEOUT: Duration = Duration::from_secs(2);

/// How hard to try before giving up on an upstream.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay after attempt `n` is `base_delay * n`.
    pub base_delay: Duration,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(300),
            timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Reads `OUTBOUND_RETRIES` and `OUTBOUND_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            attempts: std::env::var("OUTBOUND_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.attempts)
                .max(1),
            base_delay: defaults.base_delay,
            timeout: std::env::var("OUTBOUND_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        }
    }

    /// A single short attempt, for callers with a local fallback.
    pub fn fail_fast(&self) -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
            timeout: self.timeout.min(FAIL_FAST_TIMEOUT),
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Failure of a single attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// Worth another try (timeouts, connection errors, 429, 5xx).
    Transient(String),
    /// Retrying cannot help.
    Fatal(ProviderError),
}

/// Run `op` until it succeeds, fails fatally, or the policy is exhausted.
///
/// `op` receives the 1-based attempt number.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, ProviderError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        let outcome = match tokio::time::timeout(policy.timeout, op(attempt)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AttemptError::Transient(format!(
                "timed out after {:?}",
                policy.timeout
            ))),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Transient(reason)) => {
                tracing::warn!(upstream = label, attempt, attempts, %reason, "Outbound call failed");
                last_error = reason;
                if attempt < attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }

    Err(ProviderError::Upstream(format!(
        "{label} unavailable after {attempts} attempts: {last_error}"
    )))
}

/// Send a request under the retry policy and return the raw successful body.
///
/// `on_status` maps non-retryable, non-success statuses to a provider error.
pub(crate) async fn send_with_retry<F>(
    policy: &RetryPolicy,
    label: &str,
    build: impl Fn() -> RequestBuilder,
    on_status: F,
) -> Result<Vec<u8>, ProviderError>
where
    F: Fn(StatusCode) -> ProviderError,
{
    let on_status = &on_status;
    retry(policy, label, move |_| {
        let request = build();
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| AttemptError::Transient(e.to_string()))?;
            classify(response, on_status).await
        }
    })
    .await
}

async fn classify<F>(response: Response, on_status: &F) -> Result<Vec<u8>, AttemptError>
where
    F: Fn(StatusCode) -> ProviderError,
{
    let status = response.status();
    if is_transient(status) {
        return Err(AttemptError::Transient(format!("HTTP {status}")));
    }
    if !status.is_success() {
        return Err(AttemptError::Fatal(on_status(status)));
    }
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| AttemptError::Transient(e.to_string()))
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(300));
        assert_eq!(policy.delay_for(3), Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_fail_fast_tries_once_with_short_timeout() {
        let policy = RetryPolicy::default().fail_fast();
        assert_eq!(policy.attempts, 1);
        assert_eq!(policy.timeout, FAIL_FAST_TIMEOUT);
        assert_eq!(fast_policy(2).fail_fast().timeout, Duration::from_millis(200));

        let calls = AtomicU32::new(0);
        let result: Result<(), ProviderError> = retry(&policy, "rates", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AttemptError::Transient("connection refused".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(!is_transient(StatusCode::NOT_FOUND));
        assert!(!is_transient(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);

        let result = retry(&fast_policy(3), "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(AttemptError::Transient("flaky".to_string()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_policy_attempts() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry(&fast_policy(2), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AttemptError::Transient("down".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Upstream(msg)) if msg.contains("down")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fatal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry(&fast_policy(5), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AttemptError::Fatal(ProviderError::NotFound("x".to_string()))) }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_attempts_time_out() {
        let policy = RetryPolicy {
            attempts: 2,
            base_delay: Duration::from_millis(1),
            timeout: Duration::from_millis(10),
        };

        let result: Result<(), _> = retry(&policy, "slow", |_| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Upstream(msg)) if msg.contains("timed out")));
    }
}
