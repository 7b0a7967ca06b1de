#![forbid(unsafe_code)]

//! Animation-frame scheduling.
//!
//! A [`FrameLoop`] stands in for the host's `requestAnimationFrame`. Engines
//! that need continuous re-evaluation (spring followers, the smooth-scroll
//! driver, auto-scroll) register a callback with [`FrameLoop::request`] and
//! keep the returned [`FrameHandle`]. The host calls
//! [`FrameLoop::run_frame`] once per display refresh.
//!
//! # Invariants
//!
//! 1. A callback whose handle was dropped is never invoked again.
//! 2. A callback returning [`FrameControl::Stop`] is removed after that call.
//! 3. Callbacks requested during a frame first run on the next frame.
//! 4. Every signal written during one frame notifies each subscriber once,
//!    after all callbacks have run.
//!
//! # Failure Modes
//!
//! - **Long gaps** (background tab, debugger pause): `dt` is capped at
//!   [`MAX_FRAME_DT`] so followers resume smoothly instead of lurching.
//! - **Clock going backwards**: `dt` saturates to zero.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;
use vitrine_core::BatchScope;
use web_time::Instant;

/// Largest `dt` handed to a callback.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Frame timestamp.
    pub now: Instant,
    /// Time since the previous frame, capped. Zero on the first frame.
    pub dt: Duration,
}

/// Whether a callback wants another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Run again next frame.
    Continue,
    /// Unregister.
    Stop,
}

type FrameCallback = Box<dyn FnMut(FrameTick) -> FrameControl>;

struct Entry {
    id: u64,
    cancelled: Rc<Cell<bool>>,
    callback: FrameCallback,
}

#[derive(Default)]
struct LoopInner {
    entries: Vec<Entry>,
    next_id: u64,
    last_frame: Option<Instant>,
    frames: u64,
}

/// Registry of per-frame callbacks. Clones share the same registry.
#[derive(Clone, Default)]
pub struct FrameLoop {
    inner: Rc<RefCell<LoopInner>>,
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameLoop")
            .field("callbacks", &inner.entries.len())
            .field("frames", &inner.frames)
            .finish()
    }
}

impl FrameLoop {
    /// Empty loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` to run every frame until it stops or the handle
    /// is dropped.
    pub fn request(&self, callback: impl FnMut(FrameTick) -> FrameControl + 'static) -> FrameHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry {
            id,
            cancelled: Rc::clone(&cancelled),
            callback: Box::new(callback),
        });
        FrameHandle {
            id,
            cancelled,
            detached: false,
        }
    }

    /// Run one frame at `now`. Returns the number of callbacks still
    /// registered afterwards.
    pub fn run_frame(&self, now: Instant) -> usize {
        let (mut entries, tick) = {
            let mut inner = self.inner.borrow_mut();
            let dt = inner
                .last_frame
                .map_or(Duration::ZERO, |last| now.saturating_duration_since(last))
                .min(MAX_FRAME_DT);
            inner.last_frame = Some(now);
            inner.frames += 1;
            (std::mem::take(&mut inner.entries), FrameTick { now, dt })
        };

        {
            let _batch = BatchScope::new();
            entries.retain_mut(|entry| {
                if entry.cancelled.get() {
                    return false;
                }
                match (entry.callback)(tick) {
                    FrameControl::Continue => !entry.cancelled.get(),
                    FrameControl::Stop => {
                        trace!(id = entry.id, "frame callback finished");
                        false
                    }
                }
            });
        }

        let mut inner = self.inner.borrow_mut();
        // Callbacks requested during this frame landed in the emptied list.
        entries.append(&mut inner.entries);
        inner.entries = entries;
        inner.entries.len()
    }

    /// Registered callbacks, including ones cancelled since the last frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames run so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }
}

/// Keeps a frame callback registered. Dropping it cancels the callback.
#[must_use = "dropping a FrameHandle cancels the callback"]
#[derive(Debug)]
pub struct FrameHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
    detached: bool,
}

impl FrameHandle {
    /// Cancel now.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether the callback was cancelled through this handle.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Let the callback run until it returns [`FrameControl::Stop`] on its
    /// own.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if !self.detached {
            trace!(id = self.id, "frame callback cancelled");
            self.cancelled.set(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::Signal;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn runs_until_stop() {
        let frames = FrameLoop::new();
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let _h = frames.request(move |_| {
            c.set(c.get() + 1);
            if c.get() == 3 {
                FrameControl::Stop
            } else {
                FrameControl::Continue
            }
        });

        let t0 = Instant::now();
        for i in 0..10 {
            frames.run_frame(t0 + ms(16 * i));
        }
        assert_eq!(count.get(), 3);
        assert!(frames.is_empty());
    }

    #[test]
    fn dropping_handle_cancels() {
        let frames = FrameLoop::new();
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let handle = frames.request(move |_| {
            c.set(c.get() + 1);
            FrameControl::Continue
        });

        let t0 = Instant::now();
        frames.run_frame(t0);
        drop(handle);
        frames.run_frame(t0 + ms(16));
        assert_eq!(count.get(), 1);
        assert!(frames.is_empty());
    }

    #[test]
    fn detached_runs_to_completion() {
        let frames = FrameLoop::new();
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        frames
            .request(move |_| {
                c.set(c.get() + 1);
                if c.get() < 2 {
                    FrameControl::Continue
                } else {
                    FrameControl::Stop
                }
            })
            .detach();

        let t0 = Instant::now();
        frames.run_frame(t0);
        frames.run_frame(t0 + ms(16));
        frames.run_frame(t0 + ms(32));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn dt_is_measured_and_capped() {
        let frames = FrameLoop::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _h = frames.request(move |tick| {
            s.borrow_mut().push(tick.dt);
            FrameControl::Continue
        });

        let t0 = Instant::now();
        frames.run_frame(t0);
        frames.run_frame(t0 + ms(16));
        frames.run_frame(t0 + ms(5016));
        assert_eq!(*seen.borrow(), vec![Duration::ZERO, ms(16), MAX_FRAME_DT]);
    }

    #[test]
    fn request_during_frame_runs_next_frame() {
        let frames = FrameLoop::new();
        let inner_runs = Rc::new(Cell::new(0u32));
        let spawned = Rc::new(RefCell::new(None));

        let fl = frames.clone();
        let ir = Rc::clone(&inner_runs);
        let sp = Rc::clone(&spawned);
        let _outer = frames.request(move |_| {
            if sp.borrow().is_none() {
                let ir = Rc::clone(&ir);
                let handle = fl.request(move |_| {
                    ir.set(ir.get() + 1);
                    FrameControl::Continue
                });
                *sp.borrow_mut() = Some(handle);
            }
            FrameControl::Stop
        });

        let t0 = Instant::now();
        frames.run_frame(t0);
        assert_eq!(inner_runs.get(), 0);
        assert_eq!(frames.len(), 1);
        frames.run_frame(t0 + ms(16));
        assert_eq!(inner_runs.get(), 1);
    }

    #[test]
    fn frame_writes_are_coalesced() {
        let frames = FrameLoop::new();
        let sig = Signal::new(0.0_f64);
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let _sub = sig.subscribe(move |_| h.set(h.get() + 1));

        let s = sig.clone();
        let _a = frames.request(move |_| {
            s.set(s.get() + 1.0);
            s.set(s.get() + 1.0);
            FrameControl::Continue
        });

        frames.run_frame(Instant::now());
        assert_eq!(hits.get(), 1);
        assert!((sig.get() - 2.0).abs() < f64::EPSILON);
    }
}
