//! Tagged limit values and their wire-integer encoding.

use crate::error::{Result, TollgateError};

/// Raw wire value meaning "no cap".
pub const UNLIMITED: i64 = -1;
/// Raw wire value meaning "not configured, defer to the next layer".
pub const NOT_USED: i64 = -2;

/// A resolved limit in effect for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// No cap; calls are always allowed.
    Unlimited,
    /// At most this many calls per period.
    Finite(u32),
}

impl Limit {
    /// Parse a raw wire integer (`-1` meaning unlimited, `>= 0` a cap).
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            UNLIMITED => Ok(Limit::Unlimited),
            n if n >= 0 => u32::try_from(n)
                .map(Limit::Finite)
                .map_err(|_| TollgateError::InvalidLimit(raw)),
            _ => Err(TollgateError::InvalidLimit(raw)),
        }
    }

    /// Convert back to the raw wire integer.
    pub fn to_raw(self) -> i64 {
        match self {
            Limit::Unlimited => UNLIMITED,
            Limit::Finite(n) => i64::from(n),
        }
    }

    /// Whether this limit caps calls at all.
    pub fn is_unlimited(self) -> bool {
        matches!(self, Limit::Unlimited)
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Unlimited => write!(f, "unlimited"),
            Limit::Finite(n) => write!(f, "{}", n),
        }
    }
}

/// A value accepted by `set_limit`: a limit to install, or `NotUsed` to
/// clear the layer so resolution falls through to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitUpdate {
    /// Remove the cap for this layer.
    Unlimited,
    /// Cap this layer at the given count per period.
    Finite(u32),
    /// Clear this layer's configuration.
    NotUsed,
}

impl LimitUpdate {
    /// Parse a raw wire integer (`-2` meaning not-used, `-1` unlimited,
    /// `>= 0` a cap). Anything below `-2` is rejected.
    pub fn from_raw(raw: i64) -> Result<Self> {
        if raw == NOT_USED {
            Ok(LimitUpdate::NotUsed)
        } else {
            Limit::from_raw(raw).map(LimitUpdate::from)
        }
    }

    /// Convert back to the raw wire integer.
    pub fn to_raw(self) -> i64 {
        match self {
            LimitUpdate::Unlimited => UNLIMITED,
            LimitUpdate::Finite(n) => i64::from(n),
            LimitUpdate::NotUsed => NOT_USED,
        }
    }

    /// The limit this update installs, or `None` for `NotUsed`.
    pub fn as_limit(self) -> Option<Limit> {
        match self {
            LimitUpdate::Unlimited => Some(Limit::Unlimited),
            LimitUpdate::Finite(n) => Some(Limit::Finite(n)),
            LimitUpdate::NotUsed => None,
        }
    }
}

impl From<Limit> for LimitUpdate {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Unlimited => LimitUpdate::Unlimited,
            Limit::Finite(n) => LimitUpdate::Finite(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_from_raw() {
        assert_eq!(Limit::from_raw(0).unwrap(), Limit::Finite(0));
        assert_eq!(Limit::from_raw(42).unwrap(), Limit::Finite(42));
        assert_eq!(Limit::from_raw(UNLIMITED).unwrap(), Limit::Unlimited);
    }

    #[test]
    fn test_limit_rejects_out_of_band() {
        assert!(Limit::from_raw(NOT_USED).is_err());
        assert!(Limit::from_raw(-3).is_err());
        assert!(Limit::from_raw(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_limit_raw_round_trip() {
        for raw in [UNLIMITED, 0, 1, 500] {
            assert_eq!(Limit::from_raw(raw).unwrap().to_raw(), raw);
        }
    }

    #[test]
    fn test_update_from_raw() {
        assert_eq!(LimitUpdate::from_raw(NOT_USED).unwrap(), LimitUpdate::NotUsed);
        assert_eq!(LimitUpdate::from_raw(UNLIMITED).unwrap(), LimitUpdate::Unlimited);
        assert_eq!(LimitUpdate::from_raw(7).unwrap(), LimitUpdate::Finite(7));
        assert!(LimitUpdate::from_raw(-3).is_err());
    }

    #[test]
    fn test_update_from_limit() {
        assert_eq!(LimitUpdate::from(Limit::Unlimited), LimitUpdate::Unlimited);
        assert_eq!(LimitUpdate::from(Limit::Finite(9)), LimitUpdate::Finite(9));
    }

    #[test]
    fn test_update_as_limit() {
        assert_eq!(LimitUpdate::Unlimited.as_limit(), Some(Limit::Unlimited));
        assert_eq!(LimitUpdate::Finite(9).as_limit(), Some(Limit::Finite(9)));
        assert_eq!(LimitUpdate::NotUsed.as_limit(), None);
    }
}
