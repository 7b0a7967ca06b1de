#![forbid(unsafe_code)]

//! Pointer- or scroll-driven parallax translation.
//!
//! The driver (pointer Y or a scroll offset) is normalized against the
//! viewport height so the midpoint maps to zero, scaled by a strength with
//! the sign inverted, then smoothed through a [`Spring`]:
//!
//! ```text
//! normalized = driver / viewport_height - 0.5      (0 when unknown)
//! target     = -normalized · strength
//! output     = spring(target)
//! ```
//!
//! # Invariants
//!
//! 1. Raising the driver above the midpoint never raises the target.
//! 2. Output is continuous: it moves only by spring integration.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;
use vitrine_core::{Signal, Subscriptions, ViewportSampler};

use crate::animation::{Animation, Spring};
use crate::frame::{FrameControl, FrameHandle, FrameLoop};

/// Translation in pixels at a driver one full viewport from the midpoint.
pub const DEFAULT_PARALLAX_STRENGTH: f64 = 1500.0;

/// Strength and spring tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxOptions {
    /// Output scale (default: 1500).
    pub strength: f64,
    /// Spring stiffness (default: 100).
    pub stiffness: f64,
    /// Spring damping (default: 30).
    pub damping: f64,
    /// Spring mass (default: 1).
    pub mass: f64,
}

impl Default for ParallaxOptions {
    fn default() -> Self {
        Self {
            strength: DEFAULT_PARALLAX_STRENGTH,
            stiffness: 100.0,
            damping: 30.0,
            mass: 1.0,
        }
    }
}

/// Driver position relative to the viewport midpoint, in viewport heights.
///
/// Zero when the driver is unknown or the viewport has no height.
#[must_use]
pub fn normalize_driver(driver: Option<f64>, viewport_height: f64) -> f64 {
    match driver {
        Some(y) if y.is_finite() && viewport_height > 0.0 => y / viewport_height - 0.5,
        _ => 0.0,
    }
}

/// Unsmoothed translation for `driver`.
#[must_use]
pub fn parallax_target(driver: Option<f64>, viewport_height: f64, strength: f64) -> f64 {
    -normalize_driver(driver, viewport_height) * strength
}

/// Spring-smoothed parallax layer.
#[derive(Debug, Clone)]
pub struct ParallaxFollower {
    strength: f64,
    viewport_height: f64,
    driver: Option<f64>,
    spring: Spring,
}

impl ParallaxFollower {
    /// Follower at rest at zero translation.
    #[must_use]
    pub fn new(options: ParallaxOptions, viewport_height: f64) -> Self {
        let spring = Spring::at(0.0)
            .with_stiffness(options.stiffness)
            .with_damping(options.damping)
            .with_mass(options.mass);
        Self {
            strength: options.strength,
            viewport_height,
            driver: None,
            spring,
        }
    }

    /// Latest driver value.
    #[must_use]
    pub fn driver(&self) -> Option<f64> {
        self.driver
    }

    /// Feed a new driver value.
    pub fn set_driver(&mut self, driver: Option<f64>) {
        self.driver = driver;
        self.retarget();
    }

    /// Feed a new viewport height.
    pub fn set_viewport_height(&mut self, height: f64) {
        if height.is_finite() && height >= 0.0 {
            self.viewport_height = height;
            self.retarget();
        }
    }

    /// Where the layer is heading.
    #[must_use]
    pub fn target(&self) -> f64 {
        parallax_target(self.driver, self.viewport_height, self.strength)
    }

    /// Current smoothed translation.
    #[must_use]
    pub fn translation(&self) -> f64 {
        self.spring.value()
    }

    /// Whether the layer has caught up with its target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.spring.is_complete()
    }

    /// Integrate one frame.
    pub fn tick(&mut self, dt: Duration) -> f64 {
        self.spring.tick(dt);
        self.spring.value()
    }

    /// Wire to live input.
    ///
    /// `driver` is usually a projection of the pointer
    /// (`hub.pointer().signal().map(|s| s.y)`) or of a scroll sampler. The
    /// binding holds `driver`, so a derived signal stays connected for as
    /// long as the binding lives.
    pub fn bind(
        mut self,
        driver: Signal<Option<f64>>,
        viewport: &ViewportSampler,
        frames: &FrameLoop,
    ) -> ParallaxBinding {
        self.set_viewport_height(viewport.height());
        self.set_driver(driver.get());
        let output = Signal::new(self.translation());
        let follower = Rc::new(RefCell::new(self));
        let mut subs = Subscriptions::new();

        let f = Rc::clone(&follower);
        subs.add(driver.subscribe(move |d| f.borrow_mut().set_driver(*d)));

        let f = Rc::clone(&follower);
        subs.add(
            viewport
                .signal()
                .subscribe(move |vp| f.borrow_mut().set_viewport_height(vp.height)),
        );

        let (f, out) = (Rc::clone(&follower), output.clone());
        let frame = frames.request(move |tick| {
            let value = f.borrow_mut().tick(tick.dt);
            out.set(value);
            FrameControl::Continue
        });

        ParallaxBinding {
            follower,
            output,
            _driver: driver,
            _subs: subs,
            _frame: frame,
        }
    }

    fn retarget(&mut self) {
        let target = self.target();
        trace!(target, "parallax retarget");
        self.spring.set_target(target);
    }
}

/// A [`ParallaxFollower`] wired to live input. Dropping it detaches.
#[derive(Debug)]
pub struct ParallaxBinding {
    follower: Rc<RefCell<ParallaxFollower>>,
    output: Signal<f64>,
    _driver: Signal<Option<f64>>,
    _subs: Subscriptions,
    _frame: FrameHandle,
}

impl ParallaxBinding {
    /// Smoothed translation, updated every frame.
    #[must_use]
    pub fn translation(&self) -> &Signal<f64> {
        &self.output
    }

    /// Current target.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.follower.borrow().target()
    }
}
