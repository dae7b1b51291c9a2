//! Declarative limit configuration loading.
//!
//! This module handles loading a limit document and applying it to a
//! configurable limiter through its write contract. Validation is all up
//! front: a document that fails any check is rejected before the limiter is
//! touched.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TollgateError};
use crate::ratelimit::{ConfigurableRateLimiter, LimitUpdate, UNLIMITED};

/// A declarative limit document.
///
/// ```json
/// {
///     "groups": ["a", "b"],
///     "limits": [
///         {"seller": "", "group": "", "value": 20},
///         {"seller": "s1", "group": "", "value": 10},
///         {"seller": "s1", "group": "a", "value": 15}
///     ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Accounting groups to declare
    #[serde(default)]
    pub groups: Vec<String>,
    /// Limit entries, applied in document order
    #[serde(default)]
    pub limits: Vec<LimitEntry>,
}

/// One limit assignment within a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitEntry {
    /// Tenant the limit applies to; empty targets the global layers
    #[serde(rename = "seller", default)]
    pub tenant: String,
    /// Group the limit applies to; empty targets the tenant or base layer
    #[serde(default)]
    pub group: String,
    /// Raw limit value: `>= 0`, or `-1` for unlimited
    #[serde(default)]
    pub value: i64,
}

impl RateLimitConfig {
    /// Parse a JSON limit document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TollgateError::Config(format!("failed to parse limit config: {}", e)))
    }

    /// Load a JSON limit document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading rate limit configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Validate the document without touching any limiter.
    fn validate(&self) -> Result<()> {
        let mut declared = HashSet::new();
        for group in &self.groups {
            if !declared.insert(group.as_str()) {
                return Err(TollgateError::Config(format!("group redeclared: {}", group)));
            }
        }

        for entry in &self.limits {
            if !entry.group.is_empty() && !declared.contains(entry.group.as_str()) {
                return Err(TollgateError::Config(format!(
                    "group does not exist: {}",
                    entry.group
                )));
            }
            if entry.value < 0 && entry.value != UNLIMITED {
                return Err(TollgateError::Config(format!(
                    "invalid limit: {}",
                    entry.value
                )));
            }
        }
        Ok(())
    }

    /// Validate the document, then configure `limiter` from it.
    ///
    /// Nothing is applied unless the whole document validates. Application
    /// replaces the group set first, then sets each limit in document order;
    /// validation covers every condition the write contract can reject, so
    /// the apply phase does not fail partway.
    pub fn apply(&self, limiter: &dyn ConfigurableRateLimiter) -> Result<()> {
        self.validate()?;

        limiter.set_accounting_groups(&self.groups);
        for entry in &self.limits {
            limiter.set_limit(
                &entry.tenant,
                &entry.group,
                LimitUpdate::from_raw(entry.value)?,
            )?;
        }

        info!(
            groups = self.groups.len(),
            limits = self.limits.len(),
            "Applied rate limit configuration"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::{MemoryRateLimiter, RateLimiter};
    use std::time::Duration;

    fn limiter(base_limit: u32) -> MemoryRateLimiter {
        MemoryRateLimiter::new(base_limit, Duration::from_secs(60)).unwrap()
    }

    /// Exactly `n` calls succeed, then the next one is denied.
    fn max_allowed(rl: &impl RateLimiter, tenant: &str, group: &str, n: u32) {
        for i in 0..n {
            let decision = rl.check(tenant, group);
            assert!(decision.allowed, "expected allow for {}/{} call {}", tenant, group, i);
        }
        let decision = rl.check(tenant, group);
        assert!(!decision.allowed, "expected deny for {}/{} after {} calls", tenant, group, n);
    }

    #[test]
    fn test_load_and_apply() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let doc = r#"
        {
            "groups": ["a", "b"],
            "limits": [
                {"seller": "", "group": "", "value": 20},
                {"seller": "s1", "group": "", "value": 10},
                {"seller": "s1", "group": "a", "value": 15}
            ]
        }
        "#;
        let rl = limiter(1);
        RateLimitConfig::from_json(doc).unwrap().apply(&rl).unwrap();

        max_allowed(&rl, "s", "", 20);
        max_allowed(&rl, "s", "a", 20);
        max_allowed(&rl, "s", "b", 20);
        // Unknown group: accounted to the already exhausted default bucket.
        max_allowed(&rl, "s", "c", 0);

        max_allowed(&rl, "s1", "", 10);
        max_allowed(&rl, "s1", "a", 15);
        max_allowed(&rl, "s1", "b", 10);
        max_allowed(&rl, "s1", "c", 0);
    }

    #[test]
    fn test_unlimited_value_applies() {
        let doc = r#"{"limits": [{"seller": "vip", "group": "", "value": -1}]}"#;
        let rl = limiter(1);
        RateLimitConfig::from_json(doc).unwrap().apply(&rl).unwrap();

        for _ in 0..100 {
            assert!(rl.check("vip", "").allowed);
        }
    }

    #[test]
    fn test_empty_document_parses() {
        let config = RateLimitConfig::from_json("{}").unwrap();
        assert!(config.groups.is_empty());
        assert!(config.limits.is_empty());
    }

    #[test]
    fn test_malformed_document_rejected() {
        let err = RateLimitConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, TollgateError::Config(_)));
    }

    #[test]
    fn test_redeclared_group_rejected_before_apply() {
        let doc = r#"{"groups": ["a", "a"]}"#;
        let rl = limiter(2);
        rl.set_accounting_groups(&["old".to_string()]);

        let err = RateLimitConfig::from_json(doc).unwrap().apply(&rl).unwrap_err();
        assert!(matches!(err, TollgateError::Config(_)));

        // The limiter still has its previous configuration.
        rl.set_limit("", "old", LimitUpdate::Finite(3)).unwrap();
        max_allowed(&rl, "s", "old", 3);
    }

    #[test]
    fn test_undeclared_group_reference_rejected() {
        let doc = r#"
        {
            "groups": ["a"],
            "limits": [{"seller": "s1", "group": "b", "value": 5}]
        }
        "#;
        let rl = limiter(2);
        let err = RateLimitConfig::from_json(doc).unwrap().apply(&rl).unwrap_err();
        assert!(matches!(err, TollgateError::Config(_)));
        max_allowed(&rl, "s1", "", 2);
    }

    #[test]
    fn test_out_of_band_value_rejected() {
        for value in [-2, -5] {
            let doc = format!(r#"{{"limits": [{{"seller": "s1", "group": "", "value": {}}}]}}"#, value);
            let rl = limiter(2);
            let err = RateLimitConfig::from_json(&doc).unwrap().apply(&rl).unwrap_err();
            assert!(matches!(err, TollgateError::Config(_)));
            max_allowed(&rl, "s1", "", 2);
        }
    }

    #[test]
    fn test_missing_value_defaults_to_zero() {
        let doc = r#"{"limits": [{"seller": "s1", "group": ""}]}"#;
        let rl = limiter(5);
        RateLimitConfig::from_json(doc).unwrap().apply(&rl).unwrap();

        // A zero limit denies outright.
        max_allowed(&rl, "s1", "", 0);
        max_allowed(&rl, "s2", "", 5);
    }
}
