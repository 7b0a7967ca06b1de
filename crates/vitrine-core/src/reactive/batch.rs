#![forbid(unsafe_code)]

//! Notification coalescing for a burst of [`Signal`](super::Signal) writes.
//!
//! A frame that writes many signals (every card's width, every proximity
//! scale) would otherwise notify once per write. Inside a [`BatchScope`],
//! values update immediately but notifications are queued, keyed by
//! subscriber, and flushed once when the outermost scope drops. Each
//! subscriber sees only the final value.
//!
//! # Invariants
//!
//! 1. Nested scopes flush only when the outermost one exits.
//! 2. `get()` inside a batch always returns the latest value.
//! 3. A subscriber queued more than once runs once, in first-enqueued order.

use std::cell::RefCell;

use tracing::debug;

type Deferred = Box<dyn FnOnce()>;

struct Entry {
    key: usize,
    notify: Deferred,
}

#[derive(Default)]
struct BatchContext {
    depth: u32,
    queue: Vec<Entry>,
}

thread_local! {
    static BATCH: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// Whether a batch is open on this thread.
pub fn is_batching() -> bool {
    BATCH.with(|ctx| ctx.borrow().is_some())
}

/// Queue `f` under `key` if a batch is open, otherwise run it now.
///
/// A later call with the same key replaces the queued closure but keeps its
/// position.
pub fn run_keyed(key: usize, f: impl FnOnce() + 'static) {
    let mut slot = Some(f);
    let deferred = BATCH.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        let Some(batch) = guard.as_mut() else {
            return false;
        };
        let Some(f) = slot.take() else {
            return false;
        };
        match batch.queue.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.notify = Box::new(f),
            None => batch.queue.push(Entry {
                key,
                notify: Box::new(f),
            }),
        }
        true
    });
    if !deferred && let Some(f) = slot.take() {
        f();
    }
}

fn flush() {
    let queue = BATCH.with(|ctx| {
        ctx.borrow_mut()
            .as_mut()
            .map(|b| std::mem::take(&mut b.queue))
            .unwrap_or_default()
    });
    if queue.is_empty() {
        return;
    }
    debug!(notifications = queue.len(), "batch flush");
    for entry in queue {
        (entry.notify)();
    }
}

/// RAII scope that defers signal notifications until it drops.
#[derive(Debug)]
#[must_use = "a BatchScope flushes as soon as it is dropped"]
pub struct BatchScope {
    _private: (),
}

impl BatchScope {
    /// Open a (possibly nested) batch.
    pub fn new() -> Self {
        BATCH.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            guard.get_or_insert_with(BatchContext::default).depth += 1;
        });
        Self { _private: () }
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let outermost = BATCH.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(batch) if batch.depth > 1 => {
                    batch.depth -= 1;
                    false
                }
                Some(_) => true,
                None => false,
            }
        });
        if !outermost {
            return;
        }
        // Flush while the context is still installed so writes made by
        // subscribers during the flush are coalesced too, then repeat until
        // the queue drains.
        loop {
            let pending = BATCH.with(|ctx| {
                ctx.borrow()
                    .as_ref()
                    .is_some_and(|batch| !batch.queue.is_empty())
            });
            if !pending {
                break;
            }
            flush();
        }
        BATCH.with(|ctx| ctx.borrow_mut().take());
    }
}
