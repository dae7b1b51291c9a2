//! Rate limiting logic and state management.

mod backend;
mod key;
mod limit;
mod limiter;
mod noop;
mod window;

pub use backend::{ConfigurableRateLimiter, Decision, RateLimiter};
pub use key::BucketKey;
pub use limit::{Limit, LimitUpdate, NOT_USED, UNLIMITED};
pub use limiter::MemoryRateLimiter;
pub use noop::NoopRateLimiter;
pub use window::Window;
