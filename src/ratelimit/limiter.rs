//! Core rate limiter implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{Result, TollgateError};

use super::backend::{ConfigurableRateLimiter, Decision, RateLimiter};
use super::key::BucketKey;
use super::limit::{Limit, LimitUpdate};
use super::window::Window;

/// Limit configuration and tracked windows, guarded as one unit.
///
/// Replacing the group set invalidates tenant overrides, and window creation
/// reads the configuration, so everything mutates in the same critical
/// section.
#[derive(Debug)]
struct LimiterState {
    /// Limit applied when no more specific layer is configured
    base_limit: Limit,
    /// Declared accounting groups; `None` defers to the base limit
    group_limits: HashMap<String, Option<Limit>>,
    /// Tenant-wide (`group == None`) and tenant+group overrides
    overrides: HashMap<BucketKey, Limit>,
    /// Live and not-yet-swept windows, one per bucket
    windows: HashMap<BucketKey, Window>,
}

impl LimiterState {
    /// Resolve the limit in effect for a bucket, first match wins:
    /// tenant+group override, tenant override, group default, base limit.
    ///
    /// Pure lookup against the current configuration; expects the key's
    /// group to already be normalized.
    fn resolve(&self, key: &BucketKey) -> Limit {
        if let Some(group) = &key.group {
            if let Some(limit) = self.overrides.get(key) {
                return *limit;
            }
            if let Some(limit) = self.overrides.get(&BucketKey::tenant_wide(&key.tenant)) {
                return *limit;
            }
            if let Some(Some(limit)) = self.group_limits.get(group) {
                return *limit;
            }
        } else if let Some(limit) = self.overrides.get(key) {
            return *limit;
        }
        self.base_limit
    }
}

/// Normalize a requested group against the declared set.
///
/// An empty or undeclared group accounts to the tenant's default bucket.
fn normalize_group<'a>(
    group_limits: &HashMap<String, Option<Limit>>,
    group: &'a str,
) -> Option<&'a str> {
    if !group.is_empty() && group_limits.contains_key(group) {
        Some(group)
    } else {
        None
    }
}

/// The core rate limiter: hierarchical limit resolution plus per-bucket
/// fixed-window tracking.
///
/// This struct is thread-safe and can be shared across threads behind an
/// `Arc`. Every operation is a short, synchronous critical section.
#[derive(Debug)]
pub struct MemoryRateLimiter {
    /// Window length, fixed for the limiter's lifetime
    limit_period: Duration,
    /// All shared mutable state
    state: Mutex<LimiterState>,
}

impl MemoryRateLimiter {
    /// Create a new limiter with the given base limit and window period.
    ///
    /// A base limit of zero is valid and denies every call until a more
    /// specific layer is configured. A zero period is rejected.
    pub fn new(base_limit: u32, limit_period: Duration) -> Result<Self> {
        if limit_period.is_zero() {
            return Err(TollgateError::InvalidPeriod);
        }

        Ok(Self {
            limit_period,
            state: Mutex::new(LimiterState {
                base_limit: Limit::Finite(base_limit),
                group_limits: HashMap::new(),
                overrides: HashMap::new(),
                windows: HashMap::new(),
            }),
        })
    }

    /// Number of buckets currently tracked, live or awaiting sweep.
    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }
}

impl RateLimiter for MemoryRateLimiter {
    fn limit_period(&self) -> Duration {
        self.limit_period
    }

    fn check(&self, tenant: &str, group: &str) -> Decision {
        if tenant.is_empty() {
            return Decision::deny_zero();
        }

        let now = Instant::now();
        let mut state = self.state.lock();

        let group = normalize_group(&state.group_limits, group);
        let key = BucketKey::new(tenant, group);

        trace!(key = %key, "Checking rate limit");

        if let Some(window) = state.windows.get_mut(&key) {
            if window.is_live(now) {
                let allowed = window.try_consume();
                if !allowed {
                    debug!(key = %key, "Rate limit exceeded");
                }
                return Decision {
                    allowed,
                    limit: Limit::Finite(window.limit()),
                    remaining: Limit::Finite(window.remaining()),
                };
            }
        }

        // First call for this bucket, or its window has expired: resolve
        // the limit now in effect and start over.
        match state.resolve(&key) {
            Limit::Unlimited => {
                // Unlimited buckets need no tracking.
                state.windows.remove(&key);
                Decision::allow_unlimited()
            }
            Limit::Finite(0) => {
                state.windows.remove(&key);
                debug!(key = %key, "Rate limit exceeded");
                Decision::deny_zero()
            }
            Limit::Finite(limit) => {
                debug!(key = %key, limit = limit, "Opening rate limit window");
                let window = Window::open(now + self.limit_period, limit);
                let decision = Decision {
                    allowed: true,
                    limit: Limit::Finite(limit),
                    remaining: Limit::Finite(window.remaining()),
                };
                state.windows.insert(key, window);
                decision
            }
        }
    }

    fn delete_expired(&self, max_records: usize) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();

        let mut deleted = 0;
        state.windows.retain(|_, window| {
            if max_records > 0 && deleted == max_records {
                return true;
            }
            if window.is_live(now) {
                true
            } else {
                deleted += 1;
                false
            }
        });

        if deleted > 0 {
            debug!(deleted = deleted, "Swept expired rate limit windows");
        }
        deleted
    }
}

impl ConfigurableRateLimiter for MemoryRateLimiter {
    fn set_accounting_groups(&self, groups: &[String]) {
        let mut state = self.state.lock();

        state.group_limits = groups.iter().map(|g| (g.clone(), None)).collect();
        // Overrides may reference groups that no longer exist; drop them all.
        state.overrides.clear();

        debug!(groups = groups.len(), "Replaced accounting groups");
    }

    fn set_limit(&self, tenant: &str, group: &str, value: LimitUpdate) -> Result<()> {
        let mut state = self.state.lock();

        // A named group must be declared, whatever layer is being set.
        if !group.is_empty() && !state.group_limits.contains_key(group) {
            return Err(TollgateError::UnknownGroup(group.to_string()));
        }

        if !tenant.is_empty() {
            let key = BucketKey::new(tenant, (!group.is_empty()).then_some(group));
            match value.as_limit() {
                Some(limit) => {
                    state.overrides.insert(key, limit);
                }
                None => {
                    state.overrides.remove(&key);
                }
            }
        } else if !group.is_empty() {
            if let Some(slot) = state.group_limits.get_mut(group) {
                *slot = value.as_limit();
            }
        } else {
            match value.as_limit() {
                Some(limit) => state.base_limit = limit,
                None => return Err(TollgateError::ImmutableBaseLimit),
            }
        }

        debug!(tenant = %tenant, group = %group, value = value.to_raw(), "Set limit");
        Ok(())
    }

    fn remove_tenant_overrides(&self, tenant: &str) {
        let mut state = self.state.lock();

        if tenant.is_empty() {
            state.overrides.clear();
        } else {
            state.overrides.retain(|key, _| key.tenant != tenant);
        }

        debug!(tenant = %tenant, "Removed tenant overrides");
    }

    fn remove_all_overrides(&self) {
        let mut state = self.state.lock();

        state.overrides.clear();
        for limit in state.group_limits.values_mut() {
            *limit = None;
        }

        debug!("Removed all overrides");
    }
}
