#![forbid(unsafe_code)]

//! Time-stepped animation primitives.
//!
//! Everything here is advanced explicitly with a `dt`, never by a hidden
//! timer, so the same input sequence always produces the same motion.

pub mod easing;
pub mod spring;
pub mod tween;

use std::time::Duration;

pub use easing::{EasingFn, ease_in_out, ease_out_expo, linear};
pub use spring::Spring;
pub use tween::Tween;

/// A value that evolves as time is fed to it.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end state.
    fn is_complete(&self) -> bool;

    /// Current output, in the animation's own units.
    fn value(&self) -> f64;

    /// Return to the starting state.
    fn reset(&mut self);
}
