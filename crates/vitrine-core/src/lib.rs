#![forbid(unsafe_code)]

//! Core: reactive signals, raw input sampling, and geometry.
//!
//! # Role in Vitrine
//! `vitrine-core` is the input layer. It turns a stream of raw browser-style
//! events (pointer moves, scrolls, resizes, taps) into reactive [`Signal`]s
//! that the motion engines in `vitrine-motion` read from.
//!
//! # Primary responsibilities
//! - **Signal**: shared, version-tracked values with RAII subscriptions.
//! - **Samplers**: latest pointer position, scroll offset, and viewport size.
//! - **InputHub**: single dispatch point that fans events out to samplers.
//! - **Throttle**: time-based sample gating for downstream consumers.
//!
//! # How it fits in the system
//! Everything here runs on one UI thread. Values are `Rc`-shared and never
//! cross threads; ordering is guaranteed only within a single signal.

pub mod clock;
pub mod event;
pub mod geometry;
pub mod input;
pub mod reactive;
pub mod sampler;
pub mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{InputEvent, TimedEvent};
pub use geometry::{Point, Rect};
pub use input::InputHub;
pub use reactive::{BatchScope, Signal, Subscription, Subscriptions};
pub use sampler::{
    Breakpoint, PointerSample, PointerSampler, ScrollContainer, ScrollSampler, Viewport,
    ViewportSampler,
};
pub use throttle::Throttle;
