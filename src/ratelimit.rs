//! Pre-flight throttling for named API actions.

use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

/// Default per-action dispatch rate, matching the upstream API quota of
/// 20 requests per second per action.
const DEFAULT_ACTIONS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

/// Token-bucket gate consulted before dispatching a named API action.
///
/// One bucket per action name. Share a single instance via `Arc` so every
/// caller in a run draws from the same quota.
pub struct ActionRateLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
    actions_per_second: NonZeroU32,
}

impl ActionRateLimiter {
    /// Creates a limiter allowing `actions_per_second` dispatches per action.
    pub fn new(actions_per_second: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::keyed(Quota::per_second(actions_per_second)),
            actions_per_second,
        }
    }

    /// Waits until the bucket for `action` allows one more dispatch.
    pub async fn check(&self, action: &str) {
        self.limiter.until_key_ready(&action.to_string()).await;
    }

    /// Non-blocking variant; `true` when the action may dispatch immediately.
    pub fn try_check(&self, action: &str) -> bool {
        self.limiter.check_key(&action.to_string()).is_ok()
    }

    /// Configured per-action rate.
    pub fn actions_per_second(&self) -> NonZeroU32 {
        self.actions_per_second
    }
}

impl Default for ActionRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIONS_PER_SECOND)
    }
}

impl std::fmt::Debug for ActionRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRateLimiter")
            .field("actions_per_second", &self.actions_per_second)
            .finish()
    }
}
