//! Rate limiting stage between the normalizer and the request supervisor
//!
//! A synchronous state machine over `tokio::time::Instant`; the pipeline
//! driver owns the timer and calls [`RateLimiter::poll_due`] once
//! [`RateLimiter::next_deadline`] has passed.

use std::collections::VecDeque;
use tokio::time::Instant;

use crate::modules::search::domain::{NormalizedTerm, RateLimitPolicy};

pub struct RateLimiter {
    policy: RateLimitPolicy,
    scheduled: VecDeque<(Instant, NormalizedTerm)>,
    suppressed_until: Option<Instant>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            scheduled: VecDeque::new(),
            suppressed_until: None,
        }
    }

    /// Accept a normalized term arriving at `now`
    pub fn offer(&mut self, term: NormalizedTerm, now: Instant) {
        match self.policy {
            RateLimitPolicy::Debounce { window } => {
                if let Some((_, discarded)) = self.scheduled.pop_back() {
                    log::trace!("Debounce: '{}' replaced by '{}'", discarded, term);
                }
                self.scheduled.clear();
                self.scheduled.push_back((now + window, term));
            }
            RateLimitPolicy::DelayThenThrottle { delay, .. } => {
                // Delay is constant, so the queue stays ordered by due time
                self.scheduled.push_back((now + delay, term));
            }
        }
    }

    /// When the earliest scheduled term becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduled.front().map(|(due, _)| *due)
    }

    pub fn has_pending(&self) -> bool {
        !self.scheduled.is_empty()
    }

    /// Release at most one due term.
    ///
    /// Terms that reach the throttle while it is closed are dropped. Call
    /// again while `next_deadline() <= now` to drain the rest.
    pub fn poll_due(&mut self, now: Instant) -> Option<NormalizedTerm> {
        while let Some((due, _)) = self.scheduled.front() {
            if *due > now {
                break;
            }

            let (_, term) = self.scheduled.pop_front()?;

            match self.policy {
                RateLimitPolicy::Debounce { .. } => return Some(term),
                RateLimitPolicy::DelayThenThrottle { interval, .. } => {
                    let open = self.suppressed_until.map_or(true, |until| now >= until);
                    if open {
                        self.suppressed_until = Some(now + interval);
                        return Some(term);
                    }
                    log::trace!("Throttle: '{}' suppressed", term);
                }
            }
        }

        None
    }

    /// Discard every scheduled emission
    pub fn clear(&mut self) {
        self.scheduled.clear();
        self.suppressed_until = None;
    }
}
