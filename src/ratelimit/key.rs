//! Bucket key generation and handling.

/// A key that uniquely identifies one quota bucket.
///
/// The key is a tenant identifier plus the normalized accounting group:
/// `None` is the default group, shared by calls that name no group (or an
/// undeclared one). Used directly as a map key, so tenant and group names
/// need no separator encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// The tenant being limited
    pub tenant: String,
    /// The normalized accounting group, if any
    pub group: Option<String>,
}

impl BucketKey {
    /// Create a new bucket key for a tenant and normalized group.
    pub fn new(tenant: &str, group: Option<&str>) -> Self {
        Self {
            tenant: tenant.to_string(),
            group: group.map(str::to_string),
        }
    }

    /// Create a key covering the tenant's default group.
    pub fn tenant_wide(tenant: &str) -> Self {
        Self::new(tenant, None)
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{}/{}", self.tenant, group),
            None => write!(f, "{}", self.tenant),
        }
    }
}
