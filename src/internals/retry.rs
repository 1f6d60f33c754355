//! Retry logic with exponential backoff
//!
//! Retries belong to the transport, not the facade:
//! - Adapter-library providers retry retryable failures up to `max_retries` times
//! - Raw-HTTP providers make a single attempt
//! - Exponential backoff: 1s, 2s, 4s, 8s, 16s maximum, with up to 10% jitter
//! - Every attempt is bounded by the provider's `timeout_seconds`
//!
//! An executor is built per call, so no state is shared between requests.

use crate::config::ProviderConfig;
use crate::error::{CallFailureKind, LlmError, LlmResult};
use crate::logging::{log_debug, log_error};

use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Retry policy configuration for LLM requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Request timeout for individual attempts
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
            backoff_multiplier: 2.0,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy for a provider's transport path.
    pub fn for_provider(config: &ProviderConfig) -> Self {
        let max_attempts = if config.uses_adapter_library {
            config.max_retries.saturating_add(1)
        } else {
            1
        };

        Self {
            max_attempts,
            request_timeout: Duration::from_secs(config.timeout_seconds),
            ..Self::default()
        }
    }
}

/// Runs one logical request with retries
#[derive(Debug)]
pub(crate) struct RetryExecutor<'a> {
    pub(crate) policy: &'a RetryPolicy,
    pub(crate) provider: &'a str,
}

impl<'a> RetryExecutor<'a> {
    pub fn new(policy: &'a RetryPolicy, provider: &'a str) -> Self {
        Self { policy, provider }
    }

    /// Execute a request with retry logic
    pub async fn execute<F, Fut, T>(&self, operation: F) -> LlmResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = LlmResult<T>>,
    {
        let start_time = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            log_debug!(
                provider = self.provider,
                attempt = attempt,
                max_attempts = max_attempts,
                "Executing request"
            );

            let operation_start = Instant::now();
            let error = match tokio::time::timeout(self.policy.request_timeout, operation()).await
            {
                Ok(Ok(response)) => {
                    log_debug!(
                        provider = self.provider,
                        attempt = attempt,
                        duration_ms = operation_start.elapsed().as_millis() as u64,
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Ok(Err(error)) => error,
                Err(_elapsed) => LlmError::llm_call(
                    self.provider,
                    CallFailureKind::Timeout,
                    None,
                    format!(
                        "no response within {}s",
                        self.policy.request_timeout.as_secs()
                    ),
                    None,
                ),
            };

            if !error.is_retryable() || attempt >= max_attempts {
                if attempt > 1 {
                    log_error!(
                        provider = self.provider,
                        attempts = attempt,
                        total_duration_ms = start_time.elapsed().as_millis() as u64,
                        error = %error,
                        "Request failed after all retry attempts"
                    );
                }
                return Err(error);
            }

            let delay = self.delay_for(attempt, &error);
            log_debug!(
                provider = self.provider,
                attempt = attempt,
                max_attempts = max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Request failed, retrying after delay"
            );
            sleep(delay).await;
        }
    }

    /// Backoff delay, stretched to honor a vendor `retry-after` up to `max_delay`.
    fn delay_for(&self, attempt: u32, error: &LlmError) -> Duration {
        let backoff = self.calculate_delay(attempt);
        match error.call_failure_kind() {
            Some(CallFailureKind::RateLimited {
                retry_after_seconds,
            }) => backoff.max(Duration::from_secs(retry_after_seconds).min(self.policy.max_delay)),
            _ => backoff,
        }
    }

    /// Calculate delay for exponential backoff
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_seconds = self.policy.initial_delay.as_secs_f64()
            * self
                .policy
                .backoff_multiplier
                .powi(attempt.saturating_sub(1) as i32);

        // A negative or NaN multiplier must not produce a negative sleep
        let delay_seconds = if delay_seconds.is_nan() {
            0.0
        } else {
            delay_seconds.clamp(0.0, self.policy.max_delay.as_secs_f64())
        };

        // Add jitter to prevent thundering herd
        let jitter = fastrand::f64() * 0.1; // Up to 10% jitter
        Duration::try_from_secs_f64(delay_seconds * (1.0 + jitter)).unwrap_or(self.policy.max_delay)
    }
}
