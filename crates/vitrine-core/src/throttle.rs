#![forbid(unsafe_code)]

//! Leading-edge time throttle.
//!
//! Samplers run at full event fidelity; consumers that do not need every
//! sample put a [`Throttle`] in front of their own handler.

use std::time::Duration;

use web_time::Instant;

/// Accepts at most one sample per `interval`.
///
/// The first sample is always accepted. A later sample is accepted once at
/// least `interval` has elapsed since the previously accepted one. A zero
/// interval accepts everything.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Configured spacing.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a sample arriving at `now` passes, recording it if so.
    pub fn accept(&mut self, now: Instant) -> bool {
        let pass = match self.last_accepted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if pass {
            self.last_accepted = Some(now);
        }
        pass
    }

    /// Forget the last accepted sample.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
