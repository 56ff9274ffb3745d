//! Per-source request budgets.
//!
//! A saturated source is skipped for the current cycle rather than waited
//! on — skipping is not a failure and does not trigger fallback on its own.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{Quota, RateLimiter};

/// Request budget: at most `max_requests` per `window`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub max_requests: NonZeroU32,
    pub window: Duration,
}

impl RateLimit {
    pub fn per_minute(max_requests: NonZeroU32) -> Self {
        RateLimit {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

/// Non-blocking limiter wrapped around governor's GCRA state.
pub struct SourceLimiter {
    inner: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl SourceLimiter {
    pub fn new(limit: RateLimit) -> Self {
        let period = limit.window / limit.max_requests.get();
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_minute(limit.max_requests))
            .allow_burst(limit.max_requests);
        SourceLimiter {
            inner: RateLimiter::direct(quota),
        }
    }

    /// Take one slot from the window if available.
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(n: u32) -> RateLimit {
        RateLimit::per_minute(NonZeroU32::new(n).unwrap())
    }

    #[test]
    fn test_allows_up_to_budget_then_denies() {
        let limiter = SourceLimiter::new(limit(3));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_single_request_budget() {
        let limiter = SourceLimiter::new(limit(1));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
