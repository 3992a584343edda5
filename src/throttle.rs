//! Rate limit for high-frequency events.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
/// Lets an event through at most once per interval.
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    #[must_use]
    /// A throttle that has not seen any event.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether an event arriving at `now` should be handled; records it if so.
    pub fn ready(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}
