#![forbid(unsafe_code)]

//! Reactive value with change notification and version tracking.
//!
//! # Design
//!
//! [`Signal<T>`] wraps a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). When the value changes (by `PartialEq`), every live
//! subscriber is called synchronously, in registration order.
//!
//! Subscribers are held weakly: the [`Subscription`] guard returned by
//! [`Signal::subscribe`] owns the callback, so dropping the guard is the
//! unsubscribe. There is no way to leak a listener past its owner.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: `set()` releases its borrow before notifying, so a
//!   subscriber may set the same signal again. The nested notification
//!   runs to completion before the outer loop continues.
//! - **Dead subscribers**: dropped guards leave a dead weak entry which is
//!   pruned lazily on the next notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::batch;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct SignalInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
    /// Guards on upstream signals for values derived with [`Signal::map`].
    upstream: Vec<Subscription>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning a `Signal` yields another handle to the same value and the same
/// subscriber list.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
/// 4. A subscriber whose guard was dropped is never called again.
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Create a signal holding `value`, at version 0, with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value,
                version: 0,
                subscribers: Vec::new(),
                upstream: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Register `callback` for every future change.
    ///
    /// The callback is not invoked with the current value; call
    /// [`get`](Self::get) for that. Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Derive a signal whose value is `f(source)`, kept current for as long
    /// as the derived signal is alive.
    ///
    /// The derived signal holds its own upstream guard and a handle to
    /// `self`, so dropping every handle to it disconnects it from `self`.
    pub fn map<U, F>(&self, f: F) -> Signal<U>
    where
        U: Clone + PartialEq + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let derived = Signal::new(self.with(&f));
        let weak = Rc::downgrade(&derived.inner);
        let guard = self.subscribe(move |value| {
            if let Some(inner) = weak.upgrade() {
                Signal { inner }.set(f(value));
            }
        });
        // Hold the source too, so intermediate links in a chain of maps
        // stay alive while anything downstream is.
        derived.inner.borrow_mut().upstream.push(Subscription {
            _guard: Box::new((guard, self.clone())),
        });
        derived
    }

    /// Current version. Useful for dirty-checking once per frame.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };
        if callbacks.is_empty() {
            return;
        }

        if batch::is_batching() {
            for cb in callbacks {
                let key = Rc::as_ptr(&cb) as *const () as usize;
                let source = self.clone();
                batch::run_keyed(key, move || {
                    let latest = source.get();
                    cb(&latest);
                });
            }
            return;
        }

        let value = self.inner.borrow().value.clone();
        trace!(
            subscribers = callbacks.len(),
            version = self.version(),
            "signal changed"
        );
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping it makes the callback unreachable from the signal.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let sig = Signal::new(42);
        assert_eq!(sig.get(), 42);
        assert_eq!(sig.version(), 0);

        sig.set(99);
        assert_eq!(sig.get(), 99);
        assert_eq!(sig.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let sig = Signal::new(1.5_f64);
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let _sub = sig.subscribe(move |_| h.set(h.get() + 1));

        sig.set(1.5);
        assert_eq!(sig.version(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn subscriber_receives_new_value() {
        let sig = Signal::new(0);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sub = sig.subscribe(move |v| s.set(*v));

        sig.set(7);
        assert_eq!(seen.get(), 7);
        sig.set(11);
        assert_eq!(seen.get(), 11);
    }

    #[test]
    fn dropping_guard_unsubscribes() {
        let sig = Signal::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let sub = sig.subscribe(move |_| h.set(h.get() + 1));

        sig.set(1);
        drop(sub);
        sig.set(2);
        assert_eq!(hits.get(), 1);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn update_in_place() {
        let sig = Signal::new(vec![1, 2]);
        sig.update(|v| v.push(3));
        assert_eq!(sig.get(), vec![1, 2, 3]);
        assert_eq!(sig.version(), 1);

        sig.update(|_| {});
        assert_eq!(sig.version(), 1);
    }

    #[test]
    fn registration_order() {
        let sig = Signal::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&log);
        let _s1 = sig.subscribe(move |_| a.borrow_mut().push('a'));
        let b = Rc::clone(&log);
        let _s2 = sig.subscribe(move |_| b.borrow_mut().push('b'));

        sig.set(1);
        assert_eq!(*log.borrow(), vec!['a', 'b']);
    }

    #[test]
    fn reentrant_set_from_subscriber() {
        let sig = Signal::new(0);
        let handle = sig.clone();
        let _sub = sig.subscribe(move |v| {
            if *v < 3 {
                handle.set(*v + 1);
            }
        });

        sig.set(1);
        assert_eq!(sig.get(), 3);
    }

    #[test]
    fn map_tracks_source() {
        let px = Signal::new(1280.0_f64);
        let wide = px.map(|w| *w > 1024.0);
        assert!(wide.get());

        px.set(640.0);
        assert!(!wide.get());
    }

    #[test]
    fn dropped_map_disconnects() {
        let src = Signal::new(0);
        let derived = src.map(|v| v * 2);
        assert_eq!(src.subscriber_count(), 1);

        drop(derived);
        src.set(1);
        assert_eq!(src.subscriber_count(), 0);
    }

    #[test]
    fn debug_format() {
        let sig = Signal::new(5);
        let dbg = format!("{sig:?}");
        assert!(dbg.contains("Signal"));
        assert!(dbg.contains("version"));
    }
}
