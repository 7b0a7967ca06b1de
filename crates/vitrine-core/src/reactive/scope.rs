#![forbid(unsafe_code)]

//! Owned bag of subscriptions released together.
//!
//! Engines that listen to several signals (pointer, scroll, resize, route)
//! keep every guard in one [`Subscriptions`] so teardown is a single call,
//! and also happens on drop if the owner forgets.

use tracing::trace;

use super::signal::Subscription;

/// A set of [`Subscription`] guards with a shared lifetime.
#[derive(Debug, Default)]
pub struct Subscriptions {
    guards: Vec<Subscription>,
    disposed: bool,
}

impl Subscriptions {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a guard.
    ///
    /// Adding to a disposed bag drops the guard immediately, so late
    /// subscriptions made during teardown never outlive it.
    pub fn add(&mut self, guard: Subscription) {
        if self.disposed {
            return;
        }
        self.guards.push(guard);
    }

    /// Number of live guards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the bag holds no guards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every guard. Idempotent.
    pub fn dispose(&mut self) {
        if !self.guards.is_empty() {
            trace!(released = self.guards.len(), "subscriptions disposed");
        }
        self.guards.clear();
        self.disposed = true;
    }
}

impl Extend<Subscription> for Subscriptions {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        for guard in iter {
            self.add(guard);
        }
    }
}
