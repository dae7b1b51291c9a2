//! Fixed-window tracking records.

use std::time::Instant;

/// The live tracking record for one bucket.
///
/// A window exists only for finite limits greater than zero; unlimited and
/// zero-limit buckets are decided without one. Opening a window consumes the
/// call that triggered it, so `remaining` starts at `limit - 1` and never
/// exceeds `limit`.
#[derive(Debug, Clone)]
pub struct Window {
    /// Instant after which this window no longer applies
    expires_at: Instant,
    /// The limit that was in effect when the window opened
    limit: u32,
    /// Calls still allowed within this window
    remaining: u32,
}

impl Window {
    /// Open a new window for a resolved limit, consuming the opening call.
    ///
    /// Callers must ensure `limit > 0`.
    pub fn open(expires_at: Instant, limit: u32) -> Self {
        debug_assert!(limit > 0);
        Self {
            expires_at,
            limit,
            remaining: limit - 1,
        }
    }

    /// Whether the window still applies at `now`.
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    /// Consume one call if quota remains.
    ///
    /// Returns `true` and decrements on success; leaves `remaining` at zero
    /// on denial, so repeated denials report the same state.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// The limit frozen into this window at creation.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Calls still allowed within this window.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_open_consumes_first_call() {
        let w = Window::open(Instant::now() + Duration::from_secs(1), 5);
        assert_eq!(w.limit(), 5);
        assert_eq!(w.remaining(), 4);
    }

    #[test]
    fn test_consume_until_empty() {
        let mut w = Window::open(Instant::now() + Duration::from_secs(1), 3);
        assert!(w.try_consume());
        assert!(w.try_consume());
        assert_eq!(w.remaining(), 0);

        // Quota exhausted; denial is idempotent.
        assert!(!w.try_consume());
        assert!(!w.try_consume());
        assert_eq!(w.remaining(), 0);
        assert_eq!(w.limit(), 3);
    }

    #[test]
    fn test_liveness() {
        let now = Instant::now();
        let w = Window::open(now + Duration::from_millis(100), 1);
        assert!(w.is_live(now));
        assert!(!w.is_live(now + Duration::from_millis(100)));
        assert!(!w.is_live(now + Duration::from_millis(200)));
    }

    #[test]
    fn test_limit_of_one_denies_after_opening() {
        let mut w = Window::open(Instant::now() + Duration::from_secs(1), 1);
        assert_eq!(w.remaining(), 0);
        assert!(!w.try_consume());
    }
}
