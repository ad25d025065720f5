//! Token bucket rate limiter
//!
//! One limiter per client instance, shared by clones of that client.

use super::config::RateLimitConfig;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Token bucket rate limiter for controlling API request rates
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
    config: RateLimitConfig,
}

#[derive(Debug)]
struct RateLimiterInner {
    tokens: f64,
    last_refill: Instant,
    requests_made: u64,
    requests_delayed: u64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let initial_tokens = if config.enabled {
            config.burst_capacity as f64
        } else {
            f64::MAX
        };

        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                tokens: initial_tokens,
                last_refill: Instant::now(),
                requests_made: 0,
                requests_delayed: 0,
            })),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RateLimiterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until a token is available, then take it
    pub async fn acquire(&self) {
        if !self.config.enabled {
            return;
        }

        loop {
            let should_wait = {
                let mut inner = self.lock();
                self.refill_tokens(&mut inner);

                if inner.tokens >= 1.0 {
                    inner.tokens -= 1.0;
                    inner.requests_made += 1;
                    false
                } else {
                    inner.requests_delayed += 1;
                    true
                }
            };

            if !should_wait {
                return;
            }

            let wait_duration = self.calculate_wait_time();
            debug!("Rate limiter: waiting {:?} for next token", wait_duration);
            sleep(wait_duration).await;
        }
    }

    /// Take a token without waiting. Returns false when rate limited.
    pub fn try_acquire(&self) -> bool {
        if !self.config.enabled {
            return true;
        }

        let mut inner = self.lock();
        self.refill_tokens(&mut inner);

        if inner.tokens >= 1.0 {
            inner.tokens -= 1.0;
            inner.requests_made += 1;
            true
        } else {
            inner.requests_delayed += 1;
            false
        }
    }

    pub fn stats(&self) -> RateLimiterStats {
        let inner = self.lock();
        RateLimiterStats {
            tokens_available: inner.tokens,
            requests_made: inner.requests_made,
            requests_delayed: inner.requests_delayed,
            enabled: self.config.enabled,
        }
    }

    fn refill_tokens(&self, inner: &mut RateLimiterInner) {
        let now = Instant::now();
        let elapsed = now.duration_since(inner.last_refill);

        let tokens_per_second = self.config.requests_per_minute as f64 / 60.0;
        let tokens_to_add = elapsed.as_secs_f64() * tokens_per_second;

        if tokens_to_add > 0.0 {
            inner.tokens = (inner.tokens + tokens_to_add).min(self.config.burst_capacity as f64);
            inner.last_refill = now;
        }
    }

    fn calculate_wait_time(&self) -> Duration {
        let seconds_per_token = 60.0 / self.config.requests_per_minute.max(1) as f64;
        Duration::from_secs_f64(seconds_per_token)
    }
}

#[derive(Debug, Clone)]
pub struct RateLimiterStats {
    pub tokens_available: f64,
    /// Requests that were let through
    pub requests_made: u64,
    /// Times a request found the bucket empty
    pub requests_delayed: u64,
    pub enabled: bool,
}
