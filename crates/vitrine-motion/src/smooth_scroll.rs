#![forbid(unsafe_code)]

//! Programmatic smooth-scroll driver.
//!
//! The driver owns the authoritative offset of one scroll container and
//! writes every change through that container's [`ScrollSampler`], so
//! subscribers see programmatic glides and user wheel input as one stream.
//!
//! # Invariants
//!
//! 1. The sampler's offset always equals [`SmoothScroller::offset`] after
//!    any driver call.
//! 2. With a limit set, the offset stays within `[0, limit]`.
//! 3. User input ([`scroll_by`](SmoothScroller::scroll_by),
//!    [`adopt`](SmoothScroller::adopt)) cancels any running glide.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;
use vitrine_core::{InputEvent, ScrollSampler};
use web_time::Instant;

use crate::animation::{Animation, EasingFn, Tween, ease_out_expo};
use crate::frame::{FrameControl, FrameHandle, FrameLoop};

/// Default glide length.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(1200);

/// How a programmatic scroll travels.
#[derive(Debug, Clone, Copy)]
pub struct ScrollOptions {
    /// Glide length.
    pub duration: Duration,
    /// Curve applied to linear progress.
    pub easing: EasingFn,
    /// Jump straight to the target.
    pub immediate: bool,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_SCROLL_DURATION,
            easing: ease_out_expo,
            immediate: false,
        }
    }
}

impl ScrollOptions {
    /// Jump without animating.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            immediate: true,
            ..Self::default()
        }
    }

    /// Set the glide length (builder pattern).
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the curve (builder pattern).
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }
}

/// Drives one scroll container's offset.
#[derive(Debug)]
pub struct SmoothScroller {
    sampler: ScrollSampler,
    offset: f64,
    limit: Option<f64>,
    glide: Option<Tween>,
    last_advance: Option<Instant>,
}

impl SmoothScroller {
    /// Driver writing to `sampler`, starting from its current offset.
    #[must_use]
    pub fn new(sampler: ScrollSampler) -> Self {
        let offset = sampler.offset();
        Self {
            sampler,
            offset,
            limit: None,
            glide: None,
            last_advance: None,
        }
    }

    /// Set the maximum scroll offset (builder pattern).
    #[must_use]
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.set_limit(Some(limit));
        self
    }

    /// Change the maximum scroll offset. The current offset is re-clamped.
    pub fn set_limit(&mut self, limit: Option<f64>) {
        self.limit = limit.filter(|l| l.is_finite()).map(|l| l.max(0.0));
        let clamped = self.clamp(self.offset);
        self.write(clamped);
    }

    /// Maximum scroll offset, if bounded.
    #[must_use]
    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// Current offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether a programmatic glide is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    /// Destination of the running glide.
    #[must_use]
    pub fn glide_target(&self) -> Option<f64> {
        self.glide.as_ref().map(Tween::target)
    }

    /// The sampler this driver writes to.
    #[must_use]
    pub fn sampler(&self) -> &ScrollSampler {
        &self.sampler
    }

    /// Start a programmatic scroll toward `target`.
    pub fn scroll_to(&mut self, target: f64, options: ScrollOptions) {
        if !target.is_finite() {
            return;
        }
        let target = self.clamp(target);
        if options.immediate || options.duration.is_zero() {
            self.glide = None;
            self.write(target);
            debug!(target, "scroll jumped");
            return;
        }
        debug!(
            from = self.offset,
            target,
            duration_ms = options.duration.as_millis() as u64,
            "scroll glide started"
        );
        self.glide = Some(Tween::new(self.offset, target, options.duration).easing(options.easing));
        self.last_advance = None;
    }

    /// Scroll by a user delta (wheel, touch drag). Cancels any glide.
    pub fn scroll_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.cancel();
        let next = self.clamp(self.offset + delta);
        self.write(next);
    }

    /// Adopt an offset the host moved to on its own (native scroll).
    /// Cancels any glide.
    pub fn adopt(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.cancel();
        let next = self.clamp(offset);
        self.write(next);
    }

    /// Apply a raw input event: wheel deltas scroll, native scrolls are
    /// adopted, everything else is ignored.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Wheel { delta_y } => self.scroll_by(delta_y),
            InputEvent::Scroll { offset } => self.adopt(offset),
            _ => {}
        }
    }

    /// Stop a running glide where it is.
    pub fn cancel(&mut self) {
        if self.glide.take().is_some() {
            debug!(offset = self.offset, "scroll glide cancelled");
        }
        self.last_advance = None;
    }

    /// Advance the glide to `now`. Returns whether it is still running.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(glide) = self.glide.as_mut() else {
            return false;
        };
        let dt = self
            .last_advance
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_advance = Some(now);
        glide.tick(dt);
        let value = glide.value();
        let done = glide.is_complete();
        if done {
            self.glide = None;
            self.last_advance = None;
            debug!(offset = value, "scroll glide finished");
        }
        self.write(value);
        !done
    }

    /// Advance `this` on every frame of `frames` for as long as the returned
    /// handle lives.
    pub fn drive(this: &Rc<RefCell<Self>>, frames: &FrameLoop) -> FrameHandle {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(this);
        frames.request(move |tick| match weak.upgrade() {
            Some(scroller) => {
                scroller.borrow_mut().advance(tick.now);
                FrameControl::Continue
            }
            None => FrameControl::Stop,
        })
    }

    fn clamp(&self, offset: f64) -> f64 {
        match self.limit {
            Some(limit) => offset.clamp(0.0, limit),
            None => offset.max(0.0),
        }
    }

    fn write(&mut self, offset: f64) {
        self.offset = offset;
        self.sampler.record(offset);
    }
}
