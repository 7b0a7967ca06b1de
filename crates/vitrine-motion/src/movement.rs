#![forbid(unsafe_code)]

//! Engagement detection: has the user deliberately moved since the page
//! (or the current reset key) appeared?
//!
//! [`MovementDetector`] is a stateful processor over [`InputEvent`]s. It
//! ignores everything during a warm-up delay, so cursor jitter while content
//! loads does not count as engagement. Once warm, the first sample of each
//! dimension (pointer Y, scroll offset) becomes that dimension's baseline,
//! and a later sample further than the threshold from it flips
//! `has_moved`. A click or touch-start after warm-up flips it immediately.
//!
//! # State Machine
//!
//! ```text
//! Cold ──(initial_delay elapsed)──▶ Warm ──(delta > threshold | tap)──▶ Moved
//!   ▲                                                                     │
//!   └──────────────────────────── reset ◀─────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `has_moved` implies `warmup_complete`.
//! 2. `has_moved` never reverts except through `reset`.
//! 3. After `reset`, the state is `{has_moved: false, warmup_complete: false}`
//!    with no baselines.
//!
//! # Failure Modes
//!
//! - Samples are throttled per dimension with leading and trailing edges:
//!   a sample landing inside the window is held and evaluated once the
//!   window closes (on the next `poll` or event), so a final resting
//!   position is never lost.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};
use vitrine_core::{Clock, InputEvent, InputHub, Signal, Subscriptions, Throttle};
use web_time::Instant;

use crate::frame::{FrameControl, FrameHandle, FrameLoop};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for engagement detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementOptions {
    /// Time after arming before any input counts (default: 2000ms).
    pub initial_delay: Duration,
    /// Distance from baseline, in pixels, that counts as movement (default: 5).
    /// The comparison is strict: a delta equal to the threshold does not count.
    pub threshold: f64,
    /// Minimum spacing between evaluated samples per dimension (default: 100ms).
    pub sample_throttle: Duration,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(2000),
            threshold: 5.0,
            sample_throttle: Duration::from_millis(100),
        }
    }
}

/// Published detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementState {
    /// The user has engaged since the last reset.
    pub has_moved: bool,
    /// The warm-up delay has elapsed.
    pub warmup_complete: bool,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// One throttled, baselined input dimension.
#[derive(Debug, Clone)]
struct Track {
    baseline: Option<f64>,
    throttle: Throttle,
    pending: Option<f64>,
}

impl Track {
    fn new(interval: Duration) -> Self {
        Self {
            baseline: None,
            throttle: Throttle::new(interval),
            pending: None,
        }
    }

    /// Offer a sample; returns whether it crossed the threshold.
    fn offer(&mut self, value: f64, now: Instant, threshold: f64) -> bool {
        if !self.throttle.accept(now) {
            self.pending = Some(value);
            return false;
        }
        self.pending = None;
        self.evaluate(value, threshold)
    }

    /// Evaluate a held sample if its window has closed.
    fn flush(&mut self, now: Instant, threshold: f64) -> bool {
        let Some(value) = self.pending else {
            return false;
        };
        if !self.throttle.accept(now) {
            return false;
        }
        self.pending = None;
        self.evaluate(value, threshold)
    }

    fn evaluate(&mut self, value: f64, threshold: f64) -> bool {
        match self.baseline {
            None => {
                self.baseline = Some(value);
                false
            }
            Some(base) => (value - base).abs() > threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// MovementDetector
// ---------------------------------------------------------------------------

/// Stateful engagement detector.
///
/// Feed it events with [`on_event`](Self::on_event) and call
/// [`poll`](Self::poll) periodically (every frame) so warm-up completes and
/// held samples are evaluated even when no new events arrive.
#[derive(Debug, Clone)]
pub struct MovementDetector {
    options: MovementOptions,
    armed_at: Instant,
    state: MovementState,
    pointer: Track,
    scroll: Track,
}

impl MovementDetector {
    /// Detector armed at `now`.
    #[must_use]
    pub fn new(options: MovementOptions, now: Instant) -> Self {
        Self {
            options,
            armed_at: now,
            state: MovementState::default(),
            pointer: Track::new(options.sample_throttle),
            scroll: Track::new(options.sample_throttle),
        }
    }

    /// Configured thresholds.
    #[must_use]
    pub fn options(&self) -> &MovementOptions {
        &self.options
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MovementState {
        self.state
    }

    /// Re-arm at `now`: clears movement, warm-up and baselines.
    pub fn reset(&mut self, now: Instant) {
        debug!(was_moved = self.state.has_moved, "movement detector re-armed");
        *self = Self::new(self.options, now);
    }

    /// Advance time without input.
    pub fn poll(&mut self, now: Instant) -> MovementState {
        if !self.state.warmup_complete
            && now.saturating_duration_since(self.armed_at) >= self.options.initial_delay
        {
            self.state.warmup_complete = true;
            debug!("movement warm-up complete");
        }
        if self.state.warmup_complete && !self.state.has_moved {
            let threshold = self.options.threshold;
            if self.pointer.flush(now, threshold) || self.scroll.flush(now, threshold) {
                self.mark_moved("held sample");
            }
        }
        self.state
    }

    /// Process one input event arriving at `now`.
    pub fn on_event(&mut self, event: &InputEvent, now: Instant) -> MovementState {
        self.poll(now);
        if self.state.has_moved || !self.state.warmup_complete {
            return self.state;
        }

        let threshold = self.options.threshold;
        let crossed = match *event {
            InputEvent::PointerMove { y, .. } if y.is_finite() => {
                self.pointer.offer(y, now, threshold)
            }
            InputEvent::Scroll { offset } if offset.is_finite() => {
                self.scroll.offer(offset, now, threshold)
            }
            InputEvent::Click { .. } | InputEvent::TouchStart { .. } => {
                self.mark_moved("tap");
                return self.state;
            }
            _ => false,
        };
        if crossed {
            self.mark_moved("threshold");
        }
        self.state
    }

    fn mark_moved(&mut self, cause: &'static str) {
        self.state.has_moved = true;
        info!(cause, "user movement detected");
    }

    /// Wire this detector to live input.
    ///
    /// Every event dispatched on `hub` is fed in, every frame of `frames`
    /// polls, and every change of `reset_key` re-arms at `clock.now()`.
    /// The returned binding owns all of those listeners.
    pub fn bind<K, C>(
        self,
        hub: &InputHub,
        reset_key: &Signal<K>,
        frames: &FrameLoop,
        clock: C,
    ) -> MovementBinding
    where
        K: Clone + PartialEq + 'static,
        C: Clock + 'static,
    {
        let state = Signal::new(self.state);
        let detector = Rc::new(RefCell::new(self));
        let mut subs = Subscriptions::new();

        let (d, out) = (Rc::clone(&detector), state.clone());
        subs.add(hub.events().subscribe(move |timed| {
            if let Some(timed) = timed {
                let next = d.borrow_mut().on_event(&timed.event, timed.at);
                out.set(next);
            }
        }));

        let (d, out) = (Rc::clone(&detector), state.clone());
        subs.add(reset_key.subscribe(move |_| {
            let next = {
                let mut detector = d.borrow_mut();
                detector.reset(clock.now());
                detector.state()
            };
            out.set(next);
        }));

        let (d, out) = (Rc::clone(&detector), state.clone());
        let frame = frames.request(move |tick| {
            let next = d.borrow_mut().poll(tick.now);
            out.set(next);
            FrameControl::Continue
        });

        MovementBinding {
            state,
            detector,
            _subs: subs,
            _frame: frame,
        }
    }
}

/// A [`MovementDetector`] wired to live input. Dropping it detaches every
/// listener.
#[derive(Debug)]
pub struct MovementBinding {
    state: Signal<MovementState>,
    detector: Rc<RefCell<MovementDetector>>,
    _subs: Subscriptions,
    _frame: FrameHandle,
}

impl MovementBinding {
    /// Published state.
    #[must_use]
    pub fn state(&self) -> &Signal<MovementState> {
        &self.state
    }

    /// Latest `has_moved`.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.state.with(|s| s.has_moved)
    }

    /// Re-arm explicitly, without a key change.
    pub fn reset(&self, now: Instant) {
        let next = {
            let mut detector = self.detector.borrow_mut();
            detector.reset(now);
            detector.state()
        };
        self.state.set(next);
    }
}
