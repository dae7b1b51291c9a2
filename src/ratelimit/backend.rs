//! Rate limiter traits for abstracting over interchangeable implementations.

use std::time::Duration;

use crate::error::Result;

use super::limit::{Limit, LimitUpdate};

/// Outcome of a single rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the call may proceed
    pub allowed: bool,
    /// The limit in effect for the bucket
    pub limit: Limit,
    /// Calls still allowed within the current window
    pub remaining: Limit,
}

impl Decision {
    /// Deny with no quota at all (empty tenant, or a resolved limit of zero).
    pub(crate) fn deny_zero() -> Self {
        Self {
            allowed: false,
            limit: Limit::Finite(0),
            remaining: Limit::Finite(0),
        }
    }

    /// Allow without tracking (an unlimited bucket).
    pub(crate) fn allow_unlimited() -> Self {
        Self {
            allowed: true,
            limit: Limit::Unlimited,
            remaining: Limit::Unlimited,
        }
    }
}

/// Read contract for rate limiter implementations.
///
/// This trait abstracts over the tracking `MemoryRateLimiter` and the
/// always-allow `NoopRateLimiter` so call sites can disable limiting
/// without changing shape.
pub trait RateLimiter: Send + Sync {
    /// The window period this limiter operates on, fixed at construction.
    fn limit_period(&self) -> Duration;

    /// Decide whether a call by `tenant` may proceed.
    ///
    /// `group` selects a separate accounting bucket within the tenant; an
    /// empty or undeclared group falls back to the tenant's default bucket.
    /// An empty `tenant` is always denied. Never fails.
    fn check(&self, tenant: &str, group: &str) -> Decision;

    /// Remove windows whose period has elapsed.
    ///
    /// Deletes at most `max_records` windows when `max_records > 0`,
    /// otherwise sweeps without bound. Returns the number deleted. Purely
    /// housekeeping: `check` detects expiry on its own.
    fn delete_expired(&self, max_records: usize) -> usize;
}

/// Write contract for limiters whose configuration can change at runtime.
pub trait ConfigurableRateLimiter: RateLimiter {
    /// Replace the set of accounting groups.
    ///
    /// Every group starts with no limit of its own. All tenant overrides
    /// are cleared, since they may reference groups that no longer exist.
    fn set_accounting_groups(&self, groups: &[String]);

    /// Set or clear one layer of the limit hierarchy.
    ///
    /// With an empty `tenant`, targets the base limit (empty `group`) or a
    /// declared group's default. With a non-empty `tenant`, targets the
    /// tenant-wide or tenant+group override; `LimitUpdate::NotUsed` removes
    /// the override. A non-empty `group` must already be declared. The base
    /// limit cannot be cleared.
    fn set_limit(&self, tenant: &str, group: &str, value: LimitUpdate) -> Result<()>;

    /// Remove every override for `tenant`, or all tenant overrides when
    /// `tenant` is empty. Group defaults and the base limit are untouched.
    fn remove_tenant_overrides(&self, tenant: &str);

    /// Remove all tenant overrides and reset every group default, leaving
    /// only the base limit.
    fn remove_all_overrides(&self);
}
