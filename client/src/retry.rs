//! HTTP retry policy with exponential backoff.
//!
//! # Retry Policy
//!
//! - Max retries: 2 (3 total attempts)
//! - Initial delay: 500ms
//! - Max delay: 8 seconds
//! - Jitter: down-jitter up to 25% (multiplier in [0.75, 1.0])
//!
//! # Retryable Conditions
//!
//! - HTTP 408, 429, 500, 502, 503, 504
//! - Connection and timeout errors
//!
//! A 409 from the management API means the entity already exists, so it is
//! never retried.
//!
//! # Headers
//!
//! - `X-Retry-Count`: 0 for initial, 1+ for retries
//! - `Idempotency-Key`: `edgemgmt-{uuid}`, same across all attempts

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (not counting initial request).
    pub max_retries: u32,
    /// Initial backoff delay before first retry.
    pub initial_delay: Duration,
    /// Maximum backoff delay.
    pub max_delay: Duration,
    /// Jitter factor for down-jitter (0.25 = up to 25% reduction).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Parse the `Retry-After` header (seconds).
///
/// Returns `Some(duration)` only when `0 < duration < 60s`.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get("retry-after")?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    let duration = Duration::from_secs(secs);
    (duration > Duration::ZERO && duration < Duration::from_secs(60)).then_some(duration)
}

#[must_use]
pub fn should_retry(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

/// Calculate retry delay with exponential backoff and jitter.
///
/// - `backoff_step`: 0 before first retry, 1 before second, etc.
/// - Respects `Retry-After` if present and valid.
#[must_use]
pub fn calculate_retry_delay(
    backoff_step: u32,
    config: &RetryConfig,
    headers: Option<&HeaderMap>,
) -> Duration {
    if let Some(headers) = headers
        && let Some(delay) = parse_retry_after(headers)
    {
        return delay;
    }

    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Down-jitter: multiply by random factor in [1 - jitter_factor, 1.0]
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

pub fn add_retry_headers(
    builder: RequestBuilder,
    retry_count: u32,
    idempotency_key: &str,
) -> RequestBuilder {
    builder
        .header("X-Retry-Count", retry_count.to_string())
        .header("Idempotency-Key", idempotency_key)
}

#[must_use]
pub fn generate_idempotency_key() -> String {
    format!("edgemgmt-{}", Uuid::new_v4())
}

/// Outcome of a retry operation.
///
/// Structurally distinguishes success from failure so callers cannot treat an
/// error response as success.
#[derive(Debug)]
pub enum RetryOutcome {
    /// Request succeeded (2xx status).
    Success(Response),
    /// Non-2xx response, either non-retryable or after exhausting retries.
    HttpError(Response),
    /// Transport failure after exhausting retries.
    ConnectionError {
        attempts: u32,
        source: reqwest::Error,
    },
    /// Transport failure that cannot be retried.
    NonRetryable(reqwest::Error),
}

impl RetryOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Send a request with automatic retries.
///
/// `build_request` is called once per attempt. Every attempt carries the same
/// `Idempotency-Key`.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> RetryOutcome
where
    F: Fn() -> RequestBuilder,
{
    let idempotency_key = generate_idempotency_key();

    for retry_count in 0..=config.max_retries {
        let last_attempt = retry_count == config.max_retries;
        let request = add_retry_headers(build_request(), retry_count, &idempotency_key);

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return RetryOutcome::Success(response);
                }
                if last_attempt || !should_retry(status) {
                    return RetryOutcome::HttpError(response);
                }

                let delay = calculate_retry_delay(retry_count, config, Some(response.headers()));
                tracing::warn!(
                    status = %status,
                    retry_count = retry_count + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after error status"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if !is_retryable_error(&e) {
                    if retry_count == 0 {
                        return RetryOutcome::NonRetryable(e);
                    }
                    return RetryOutcome::ConnectionError {
                        attempts: retry_count + 1,
                        source: e,
                    };
                }
                if last_attempt {
                    if config.max_retries == 0 {
                        return RetryOutcome::NonRetryable(e);
                    }
                    return RetryOutcome::ConnectionError {
                        attempts: retry_count + 1,
                        source: e,
                    };
                }

                let delay = calculate_retry_delay(retry_count, config, None);
                tracing::warn!(
                    error = %e,
                    retry_count = retry_count + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after connection error"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    unreachable!("retry loop always returns on its final attempt")
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}
