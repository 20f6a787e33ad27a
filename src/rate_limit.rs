//! Proactive request spacing
//!
//! The reactive path (429 plus backoff) only kicks in once the quota is
//! already blown. The [`RateLimiter`] spaces requests ahead of time so a
//! long download stays inside the hourly budget, using only 90% of it as a
//! safety margin.

use crate::config::RateLimitConfig;
use std::time::Duration;
use tokio::time::Instant;

/// Fraction of the configured quota actually used
const USAGE_FRACTION: f64 = 0.9;

/// Spaces consecutive requests to stay within a requests-per-hour budget
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter from the configured hourly quota
    pub fn new(config: &RateLimitConfig) -> Self {
        let effective_limit = (f64::from(config.requests_per_hour) * USAGE_FRACTION).max(1.0);
        Self {
            min_interval: Duration::from_secs_f64(3600.0 / effective_limit),
            last_request: None,
        }
    }

    /// Sleep just long enough to keep the minimum spacing between requests,
    /// then stamp the current request
    pub async fn wait_if_needed(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// The enforced minimum spacing between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
