#![forbid(unsafe_code)]

//! Motion: turns sampled input into continuous, physically plausible motion.
//!
//! # Role in Vitrine
//! `vitrine-motion` sits between the input layer (`vitrine-core`) and
//! whatever renders. Each engine reads signals, keeps its own state, and
//! publishes its output as a signal or returns it from a per-frame call.
//!
//! # Primary responsibilities
//! - **Animation**: spring integrator, easing curves, tweens.
//! - **FrameLoop**: animation-frame scheduling with cancel-on-drop handles.
//! - **SmoothScroller**: programmatic scroll glides over a scroll sampler.
//! - **MovementDetector**: warm-up gated "user has engaged" flag.
//! - **Proximity**: pointer-distance emphasis scale, single or batched.
//! - **Parallax**: spring-smoothed, driver-relative layer translation.
//! - **Layout / Carousel**: stacked card geometry, distance sizing, one-shot
//!   centering behind a media load gate.
//! - **AutoScroller**: hands-free scrolling with content-set growth.
//!
//! # How it fits in the system
//! Engines come in two forms. The plain type takes `now` or `dt` explicitly
//! and is fully deterministic. Its `bind`/`attach` form wires it to live
//! signals and a [`FrameLoop`], returning a binding that owns every
//! listener; dropping the binding tears them all down.

pub mod animation;
pub mod auto_scroll;
pub mod carousel;
pub mod frame;
pub mod layout;
pub mod movement;
pub mod parallax;
pub mod proximity;
pub mod smooth_scroll;

pub use animation::spring::presets;
pub use animation::{Animation, EasingFn, Spring, Tween, ease_in_out, ease_out_expo, linear};
pub use auto_scroll::{AutoScrollBinding, AutoScrollOptions, AutoScrollPhase, AutoScroller};
pub use carousel::{CardCarousel, CarouselBinding, CenteringGuard, LoadGate, selected_gallery_index};
pub use frame::{FrameControl, FrameHandle, FrameLoop, FrameTick};
pub use layout::{
    CardFrame, CardLayout, CardSizing, SizeRange, StackSpec, aspect_height, center_offset,
    frame_for, stack_layouts,
};
pub use movement::{MovementBinding, MovementDetector, MovementOptions, MovementState};
pub use parallax::{
    DEFAULT_PARALLAX_STRENGTH, ParallaxBinding, ParallaxFollower, ParallaxOptions,
    normalize_driver, parallax_target,
};
pub use proximity::{
    ElementId, ElementSlot, Measure, ProximityField, ProximityOptions, ProximityScale,
    proximity_scale,
};
pub use smooth_scroll::{ScrollOptions, SmoothScroller};
