#![forbid(unsafe_code)]

//! Damped harmonic oscillator used to smooth follow-motion.
//!
//! Converts a stepwise target (the latest parallax offset, the latest
//! proximity scale) into continuous motion:
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): pull toward the target. Higher = faster response.
//! - **damping** (c): velocity drag.
//!   - Underdamped (c < 2√(km)): overshoots, then settles.
//!   - Critically damped (c = 2√(km)): fastest approach without overshoot.
//!   - Overdamped (c > 2√(km)): slower approach, no overshoot.
//! - **mass** (m): inertia. Heavier springs respond more lazily.
//!
//! # Integration
//!
//! Semi-implicit Euler, sub-stepped at 4ms so a long frame (a background tab
//! resuming, a slow device) neither explodes nor skips the target.
//!
//! # Invariants
//!
//! 1. A spring at rest does not move until `set_target`, `impulse`, or
//!    `reset` wakes it.
//! 2. Stiffness and mass are always positive; damping is never negative.
//! 3. Position is continuous in time: no single `advance` call jumps it
//!    except `snap_to`.

use std::time::Duration;

use super::Animation;

/// Largest integration step.
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta (in output units) below which the spring may rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Velocity below which the spring may rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.05;

const MIN_STIFFNESS: f64 = 0.1;
const MIN_MASS: f64 = 0.01;

/// A damped spring tracking a movable target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring starting at `initial`, heading for `target`.
    ///
    /// Defaults: stiffness 170, damping 26, mass 1.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: initial == target,
        }
    }

    /// Spring resting at `value`.
    #[must_use]
    pub fn at(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Set stiffness (builder pattern). Clamped to a small positive minimum.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to zero.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Set mass (builder pattern). Clamped to a small positive minimum.
    #[must_use]
    pub fn with_mass(mut self, m: f64) -> Self {
        self.mass = if m.is_finite() { m.max(MIN_MASS) } else { 1.0 };
        self
    }

    /// Set the rest thresholds (builder pattern).
    #[must_use]
    pub fn with_rest_thresholds(mut self, position: f64, velocity: f64) -> Self {
        self.rest_threshold = position.abs();
        self.velocity_threshold = velocity.abs();
        self
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity, in units per second.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Stiffness.
    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping.
    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Mass.
    #[inline]
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Whether the spring has settled.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Damping coefficient that makes this spring critically damped.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Move the target. Wakes the spring unless the change is negligible.
    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            return;
        }
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Add to velocity. Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    /// Jump to `value` and rest there, discarding momentum.
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let spring_force = -self.stiffness * (self.position - self.target);
        let damping_force = -self.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, sub-stepping for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        if remaining <= 0.0 {
            return;
        }
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = self.initial == self.target;
    }
}

/// Tunings used across the site.
pub mod presets {
    use super::Spring;

    /// Pointer-follow spring for parallax layers: stiffness 100, damping 30,
    /// mass 1. Overdamped, so fast pointer sweeps glide rather than bounce.
    #[must_use]
    pub fn follow() -> Spring {
        Spring::at(0.0)
            .with_stiffness(100.0)
            .with_damping(30.0)
            .with_mass(1.0)
    }

    /// Hover emphasis spring for cards: stiffness 100, damping 15.
    #[must_use]
    pub fn hover() -> Spring {
        Spring::at(0.0).with_stiffness(100.0).with_damping(15.0)
    }

    /// Critically damped at stiffness 170.
    #[must_use]
    pub fn critical() -> Spring {
        let k: f64 = 170.0;
        Spring::at(0.0).with_stiffness(k).with_damping(2.0 * k.sqrt())
    }

    /// Gentle: low stiffness, generous damping.
    #[must_use]
    pub fn gentle() -> Spring {
        Spring::at(0.0).with_stiffness(120.0).with_damping(20.0)
    }

    /// Stiff: snappy, near-critical.
    #[must_use]
    pub fn stiff() -> Spring {
        Spring::at(0.0).with_stiffness(400.0).with_damping(38.0)
    }

    /// Slow: heavy and deliberate.
    #[must_use]
    pub fn slow() -> Spring {
        Spring::at(0.0).with_stiffness(50.0).with_damping(14.0)
    }
}
