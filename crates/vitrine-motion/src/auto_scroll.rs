#![forbid(unsafe_code)]

//! Hands-free continuous scrolling over repeating content.
//!
//! After a start delay the page creeps downward by a fixed amount each
//! frame, slower while the pointer hovers the content. Any scroll intent
//! from the user (wheel, touch) pauses it; it resumes after a period of
//! inactivity, longer on handheld viewports. The content is a repeated set;
//! when the viewport nears the end, one more copy is appended.
//!
//! # State Machine
//!
//! ```text
//! Waiting ──(start delay)──▶ Scrolling ──(wheel/touch)──▶ Paused
//!    │                           ▲                           │
//!    └───────(wheel/touch)───────┼──────────▶ Paused         │
//!                                └────(inactivity timeout)───┘
//! ```
//!
//! # Failure Modes
//!
//! - Growth has no natural end: every approach to the bottom appends a set.
//!   Set `max_content_sets` to bound it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};
use vitrine_core::{InputEvent, InputHub, Signal, Subscriptions, ViewportSampler};
use web_time::Instant;

use crate::frame::{FrameControl, FrameHandle, FrameLoop};
use crate::smooth_scroll::{ScrollOptions, SmoothScroller};

/// Timing and speed for auto-scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollOptions {
    /// Delay before the first scroll (default: 2000ms).
    pub start_delay: Duration,
    /// Pixels per frame (default: 2).
    pub speed: f64,
    /// Speed multiplier while hovering (default: 0.3).
    pub hover_factor: f64,
    /// Pause after user input on wide viewports (default: 3000ms).
    pub inactivity_desktop: Duration,
    /// Pause after user input on handheld viewports (default: 5000ms).
    pub inactivity_handheld: Duration,
    /// Content copies rendered at start (default: 2).
    pub initial_content_sets: usize,
    /// Upper bound on content copies (default: unbounded).
    pub max_content_sets: Option<usize>,
}

impl Default for AutoScrollOptions {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(2000),
            speed: 2.0,
            hover_factor: 0.3,
            inactivity_desktop: Duration::from_millis(3000),
            inactivity_handheld: Duration::from_millis(5000),
            initial_content_sets: 2,
            max_content_sets: None,
        }
    }
}

/// Where the auto-scroller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoScrollPhase {
    /// Before the start delay.
    Waiting,
    /// Moving every frame.
    Scrolling,
    /// Stopped by user input, waiting for inactivity.
    Paused,
}

/// Auto-scroll state machine.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    options: AutoScrollOptions,
    phase: AutoScrollPhase,
    resume_at: Instant,
    hovering: bool,
    handheld: bool,
    content_sets: usize,
}

impl AutoScroller {
    /// Auto-scroller created at `now`, waiting out the start delay.
    #[must_use]
    pub fn new(options: AutoScrollOptions, now: Instant) -> Self {
        Self {
            options,
            phase: AutoScrollPhase::Waiting,
            resume_at: now + options.start_delay,
            hovering: false,
            handheld: false,
            content_sets: options.initial_content_sets.max(1),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AutoScrollPhase {
        self.phase
    }

    /// Content copies to render.
    #[must_use]
    pub fn content_sets(&self) -> usize {
        self.content_sets
    }

    /// Pointer is over the content.
    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// Viewport is handheld (longer inactivity timeout).
    pub fn set_handheld(&mut self, handheld: bool) {
        self.handheld = handheld;
    }

    fn inactivity(&self) -> Duration {
        if self.handheld {
            self.options.inactivity_handheld
        } else {
            self.options.inactivity_desktop
        }
    }

    /// Process user input. Scroll intent pauses and restarts the
    /// inactivity timer.
    pub fn on_event(&mut self, event: &InputEvent, now: Instant) {
        if !event.is_scroll_intent() {
            return;
        }
        if self.phase != AutoScrollPhase::Paused {
            debug!(from = ?self.phase, "auto-scroll paused by user");
        }
        self.phase = AutoScrollPhase::Paused;
        self.resume_at = now + self.inactivity();
    }

    /// Advance to `now`. Returns the distance to scroll this frame.
    pub fn frame(&mut self, now: Instant) -> Option<f64> {
        if self.phase != AutoScrollPhase::Scrolling && now >= self.resume_at {
            info!(from = ?self.phase, "auto-scroll started");
            self.phase = AutoScrollPhase::Scrolling;
        }
        if self.phase != AutoScrollPhase::Scrolling {
            return None;
        }
        let factor = if self.hovering { self.options.hover_factor } else { 1.0 };
        Some(self.options.speed * factor)
    }

    /// Check the scroll position against the rendered content. Appends one
    /// content set when the viewport is within one viewport height of the
    /// end. Returns whether the count grew.
    pub fn on_scroll(&mut self, offset: f64, viewport_height: f64, content_height: f64) -> bool {
        if !(offset.is_finite() && viewport_height.is_finite() && content_height.is_finite()) {
            return false;
        }
        if offset + viewport_height <= content_height - viewport_height {
            return false;
        }
        if self
            .options
            .max_content_sets
            .is_some_and(|max| self.content_sets >= max)
        {
            return false;
        }
        self.content_sets += 1;
        debug!(sets = self.content_sets, "content set appended");
        true
    }

    /// Wire to live input and drive `scroller` every frame.
    ///
    /// `content_height` is the measured height of everything rendered; the
    /// host re-measures it after the content-set count grows.
    pub fn bind(
        self,
        scroller: Rc<RefCell<SmoothScroller>>,
        hub: &InputHub,
        viewport: &ViewportSampler,
        content_height: Signal<f64>,
        frames: &FrameLoop,
    ) -> AutoScrollBinding {
        let content_sets = Signal::new(self.content_sets);
        let auto = Rc::new(RefCell::new(self));
        auto.borrow_mut().set_handheld(viewport.breakpoint().is_handheld());
        let mut subs = Subscriptions::new();

        let a = Rc::clone(&auto);
        subs.add(hub.events().subscribe(move |timed| {
            if let Some(timed) = timed {
                a.borrow_mut().on_event(&timed.event, timed.at);
            }
        }));

        let a = Rc::clone(&auto);
        subs.add(
            viewport
                .breakpoint_signal()
                .subscribe(move |bp| a.borrow_mut().set_handheld(bp.is_handheld())),
        );

        let (a, out, vp) = (Rc::clone(&auto), content_sets.clone(), viewport.clone());
        let height = content_height.clone();
        let sampler = scroller.borrow().sampler().clone();
        subs.add(sampler.signal().subscribe(move |offset| {
            let sets = {
                let mut a = a.borrow_mut();
                a.on_scroll(*offset, vp.height(), height.get())
                    .then(|| a.content_sets())
            };
            if let Some(sets) = sets {
                out.set(sets);
            }
        }));

        let a = Rc::clone(&auto);
        let frame = frames.request(move |tick| {
            let delta = a.borrow_mut().frame(tick.now);
            if let Some(delta) = delta {
                let mut s = scroller.borrow_mut();
                let target = s.offset() + delta;
                s.scroll_to(target, ScrollOptions::immediate());
            }
            FrameControl::Continue
        });

        AutoScrollBinding {
            auto,
            content_sets,
            _content_height: content_height,
            _subs: subs,
            _frame: frame,
        }
    }
}

/// An [`AutoScroller`] driving a live scroller. Dropping it stops
/// everything.
#[derive(Debug)]
pub struct AutoScrollBinding {
    auto: Rc<RefCell<AutoScroller>>,
    content_sets: Signal<usize>,
    _content_height: Signal<f64>,
    _subs: Subscriptions,
    _frame: FrameHandle,
}

impl AutoScrollBinding {
    /// Content copies to render.
    #[must_use]
    pub fn content_sets(&self) -> &Signal<usize> {
        &self.content_sets
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AutoScrollPhase {
        self.auto.borrow().phase()
    }

    /// Pointer entered or left the content.
    pub fn set_hovering(&self, hovering: bool) {
        self.auto.borrow_mut().set_hovering(hovering);
    }
}
