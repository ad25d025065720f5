//! Retry and rate limiting for CMA requests

pub mod config;
pub mod rate_limiter;
pub mod retry;

pub use config::{RateLimitConfig, ResilienceConfig, ResilienceConfigBuilder};
pub use rate_limiter::{RateLimiter, RateLimiterStats};
pub use retry::{RetryConfig, RetryPolicy, RetryableError};
