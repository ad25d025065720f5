//! Resilience configuration with builder pattern

use super::retry::RetryConfig;

/// Resilience configuration shared by every request a client makes
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub rate_limit: RateLimitConfig,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_capacity: u32,
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 420, // CMA allows 7 req/s on the smallest plans
            burst_capacity: 10,
            enabled: true,
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// Fewer retries and a lower request rate, for shared spaces
    pub fn conservative() -> Self {
        Self {
            retry: RetryConfig::conservative(),
            rate_limit: RateLimitConfig {
                requests_per_minute: 240,
                burst_capacity: 5,
                enabled: true,
            },
        }
    }

    /// No retries and no rate limiting (tests, local fakes)
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::none(),
            rate_limit: RateLimitConfig {
                requests_per_minute: u32::MAX,
                burst_capacity: u32::MAX,
                enabled: false,
            },
        }
    }
}

/// Builder for ResilienceConfig
#[derive(Debug, Default)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Total attempts per request, the first one included
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn rate_limit_config(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config.rate_limit = rate_limit;
        self
    }

    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.config.rate_limit.requests_per_minute = rpm;
        self
    }

    pub fn enable_rate_limiting(mut self, enabled: bool) -> Self {
        self.config.rate_limit.enabled = enabled;
        self
    }

    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}
