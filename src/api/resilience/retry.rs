//! Retry policies with exponential backoff
//!
//! Retries transient CMA failures: transport errors, 408, 429 and 5xx responses.

use crate::api::constants::headers;
use crate::error::StoreResult;
use log::{debug, info, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Conservative config for production
    pub fn conservative() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 1.5,
            jitter: true,
        }
    }

    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Types of errors and their retry behavior
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// Network-level errors (connection timeout, DNS, etc)
    Network,
    /// HTTP 5xx server errors
    ServerError(u16),
    /// HTTP 429 Too Many Requests
    RateLimited,
    /// HTTP 408 Request Timeout
    Timeout,
    /// Non-retryable client errors (4xx except 408, 429)
    ClientError(u16),
    /// Unknown/other errors
    Unknown,
}

impl RetryableError {
    /// Determine if this error type should be retried
    pub fn should_retry(&self) -> bool {
        match self {
            RetryableError::Network => true,
            RetryableError::ServerError(_) => true,
            RetryableError::RateLimited => true,
            RetryableError::Timeout => true,
            RetryableError::ClientError(_) => false,
            RetryableError::Unknown => false,
        }
    }

    /// Classify an HTTP status code into retry behavior
    pub fn from_status_code(status: u16) -> Self {
        match status {
            408 => RetryableError::Timeout,
            429 => RetryableError::RateLimited,
            400..=499 => RetryableError::ClientError(status),
            500..=599 => RetryableError::ServerError(status),
            _ => RetryableError::Unknown,
        }
    }

    /// Classify a reqwest error
    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            RetryableError::Timeout
        } else if error.is_connect() || error.is_request() {
            RetryableError::Network
        } else if let Some(status) = error.status() {
            Self::from_status_code(status.as_u16())
        } else {
            RetryableError::Unknown
        }
    }
}

/// Retry policy that implements exponential backoff with jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Send a request with retry logic.
    ///
    /// Non-retryable responses are returned as-is so the caller can map the
    /// status. A retryable response on the last attempt is returned too.
    pub async fn execute<F, Fut>(&self, operation: F) -> StoreResult<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!("Sending request (attempt {}/{})", attempt, max_attempts);
            let last_attempt = attempt == max_attempts;

            match operation().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let classified = RetryableError::from_status_code(status);
                    if response.status().is_success() || !classified.should_retry() || last_attempt {
                        if attempt > 1 && response.status().is_success() {
                            info!("Request succeeded after {} attempts", attempt);
                        }
                        return Ok(response);
                    }

                    let mut delay = self.calculate_delay(attempt);
                    if classified == RetryableError::RateLimited {
                        if let Some(reset) = rate_limit_reset(&response) {
                            delay = delay.max(reset);
                        }
                    }
                    warn!("Request returned {} on attempt {} (retryable), waiting {:?}", status, attempt, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    let should_retry = RetryableError::from_reqwest_error(&error).should_retry();

                    if !should_retry || last_attempt {
                        warn!("Request failed permanently on attempt {} (should_retry: {}): {}",
                              attempt, should_retry, error);
                        return Err(error.into());
                    }

                    warn!("Request failed on attempt {} (retryable): {}", attempt, error);
                    let delay = self.calculate_delay(attempt);
                    debug!("Waiting {:?} before retry", delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        unreachable!("retry loop always returns on the last attempt")
    }

    /// Calculate exponential backoff delay with optional jitter
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(attempt as i32 - 1);

        let mut delay = Duration::from_millis(delay_ms as u64);

        if delay > self.config.max_delay {
            delay = self.config.max_delay;
        }

        if self.config.jitter {
            let jitter_factor = rand::rng().random_range(0.5..=1.5);
            let jittered_ms = (delay.as_millis() as f64 * jitter_factor) as u64;
            delay = Duration::from_millis(jittered_ms);
        }

        delay
    }
}

/// Parse `X-Contentful-RateLimit-Reset` (whole seconds)
fn rate_limit_reset(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(headers::X_CONTENTFUL_RATE_LIMIT_RESET)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
