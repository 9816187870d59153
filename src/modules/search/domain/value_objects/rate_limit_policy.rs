use serde::Serialize;
use std::time::Duration;

/// Default trailing-edge debounce window
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

/// How settled terms are released to the request supervisor.
///
/// Exactly one policy is active per pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateLimitPolicy {
    /// Emit a term only once no newer term arrived for `window`
    Debounce { window: Duration },

    /// Emit each term `delay` after it arrived, then suppress emissions for
    /// `interval`
    DelayThenThrottle { delay: Duration, interval: Duration },
}

impl RateLimitPolicy {
    pub fn debounce(window: Duration) -> Self {
        RateLimitPolicy::Debounce { window }
    }

    pub fn delay_then_throttle(delay: Duration, interval: Duration) -> Self {
        RateLimitPolicy::DelayThenThrottle { delay, interval }
    }

    /// How long a lone term waits before it is released
    pub fn settle_time(&self) -> Duration {
        match self {
            RateLimitPolicy::Debounce { window } => *window,
            RateLimitPolicy::DelayThenThrottle { delay, .. } => *delay,
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitPolicy::Debounce {
            window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}
