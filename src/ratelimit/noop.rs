//! Always-allow rate limiter.

use std::time::Duration;

use super::backend::{Decision, RateLimiter};

/// A limiter that never denies anything.
///
/// Drop-in replacement for `MemoryRateLimiter` at call sites where limiting
/// is disabled; keeps no state and reports every bucket as unlimited.
pub struct NoopRateLimiter {
    /// Reported window length; fixed for the limiter's lifetime
    limit_period: Duration,
}

impl NoopRateLimiter {
    /// Create a new always-allow limiter with the given nominal period.
    pub fn new(limit_period: Duration) -> Self {
        Self { limit_period }
    }
}

impl RateLimiter for NoopRateLimiter {
    fn limit_period(&self) -> Duration {
        self.limit_period
    }

    fn check(&self, _tenant: &str, _group: &str) -> Decision {
        Decision::allow_unlimited()
    }

    fn delete_expired(&self, _max_records: usize) -> usize {
        0
    }
}
