#![forbid(unsafe_code)]

//! Time sources.
//!
//! Engines take `now` explicitly. Bindings that react to signals (where no
//! timestamp arrives with the value) read it from a [`Clock`], which tests
//! replace with a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

/// A source of the current instant.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Instant;
}

/// Wall-clock time from the platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Start at `origin`.
    #[must_use]
    pub fn new(origin: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(origin)),
        }
    }

    /// Move forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }

    /// Jump to an absolute instant.
    pub fn set(&self, at: Instant) {
        self.now.set(at);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
