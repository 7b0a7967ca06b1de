#![forbid(unsafe_code)]

//! Signal samplers: the latest value of one raw input dimension.
//!
//! Each sampler owns exactly one [`Signal`] and is its only writer. Readers
//! either poll the latest value or subscribe. Samplers never throttle; the
//! pointer in particular must keep full fidelity so spring followers stay
//! smooth, and consumers throttle downstream if they need to.
//!
//! # Failure Modes
//!
//! Non-finite values (NaN, infinities) from a misbehaving host are dropped
//! rather than propagated; the previous sample stays current.

use tracing::trace;

use crate::geometry::Point;
use crate::reactive::Signal;

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Latest pointer position. Both coordinates are `None` until the first
/// pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Horizontal position, if known.
    pub x: Option<f64>,
    /// Vertical position, if known.
    pub y: Option<f64>,
}

impl PointerSample {
    /// The sample before any movement.
    pub const UNKNOWN: Self = Self { x: None, y: None };

    /// A fully known sample.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// The position as a point, if both coordinates are known.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

/// Tracks the pointer position.
#[derive(Debug, Clone)]
pub struct PointerSampler {
    sample: Signal<PointerSample>,
}

impl Default for PointerSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSampler {
    /// Create a sampler with no known position.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample: Signal::new(PointerSample::UNKNOWN),
        }
    }

    /// Record a pointer move.
    pub fn record(&self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            trace!(x, y, "non-finite pointer sample dropped");
            return;
        }
        self.sample.set(PointerSample::at(x, y));
    }

    /// Latest sample.
    #[must_use]
    pub fn latest(&self) -> PointerSample {
        self.sample.get()
    }

    /// The underlying signal, for subscription.
    #[must_use]
    pub fn signal(&self) -> &Signal<PointerSample> {
        &self.sample
    }
}

// ---------------------------------------------------------------------------
// Scroll
// ---------------------------------------------------------------------------

/// Which scroll container a [`ScrollSampler`] reports on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrollContainer {
    /// The document itself.
    Root,
    /// A nested overflow container, identified by a host-chosen name.
    Nested(String),
}

/// Tracks the vertical offset of one scroll container.
///
/// There is one authoritative sampler per container. Both user-driven scroll
/// events and a programmatic smooth-scroll driver write through
/// [`record`](Self::record), so readers never see the two disagree.
#[derive(Debug, Clone)]
pub struct ScrollSampler {
    container: ScrollContainer,
    offset: Signal<f64>,
}

impl ScrollSampler {
    /// Sampler for the document scroll.
    #[must_use]
    pub fn root() -> Self {
        Self::for_container(ScrollContainer::Root)
    }

    /// Sampler for a nested container.
    #[must_use]
    pub fn nested(name: impl Into<String>) -> Self {
        Self::for_container(ScrollContainer::Nested(name.into()))
    }

    /// Sampler for `container`, starting at offset 0.
    #[must_use]
    pub fn for_container(container: ScrollContainer) -> Self {
        Self {
            container,
            offset: Signal::new(0.0),
        }
    }

    /// Record the container's current offset.
    pub fn record(&self, offset: f64) {
        if !offset.is_finite() {
            trace!(offset, "non-finite scroll sample dropped");
            return;
        }
        self.offset.set(offset);
    }

    /// Latest offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    /// Container this sampler reports on.
    #[must_use]
    pub fn container(&self) -> &ScrollContainer {
        &self.container
    }

    /// The underlying signal, for subscription.
    #[must_use]
    pub fn signal(&self) -> &Signal<f64> {
        &self.offset
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Named viewport width classes, widest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// 1680px and wider.
    Desktop,
    /// 1441px to 1679px.
    Laptop,
    /// 769px to 1440px.
    TabletLandscape,
    /// 551px to 768px.
    TabletPortrait,
    /// 550px and narrower.
    Mobile,
}

impl Breakpoint {
    /// Classify a viewport width.
    #[must_use]
    pub fn from_width(width: f64) -> Self {
        if width <= 550.0 {
            Self::Mobile
        } else if width <= 768.0 {
            Self::TabletPortrait
        } else if width <= 1440.0 {
            Self::TabletLandscape
        } else if width < 1680.0 {
            Self::Laptop
        } else {
            Self::Desktop
        }
    }

    /// Phones and portrait tablets, where layouts switch to their stacked,
    /// touch-first variants.
    #[must_use]
    pub const fn is_handheld(self) -> bool {
        matches!(self, Self::Mobile | Self::TabletPortrait)
    }

    /// Stable lowercase name, as used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Laptop => "laptop",
            Self::TabletLandscape => "tabletLandscape",
            Self::TabletPortrait => "tabletPortrait",
            Self::Mobile => "mobile",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inner viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Inner width in pixels.
    pub width: f64,
    /// Inner height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width class of this viewport.
    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.width)
    }
}

/// Tracks viewport size, with the breakpoint derived from it.
#[derive(Debug, Clone)]
pub struct ViewportSampler {
    viewport: Signal<Viewport>,
    breakpoint: Signal<Breakpoint>,
}

impl ViewportSampler {
    /// Create a sampler seeded with the host's initial dimensions.
    #[must_use]
    pub fn new(initial: Viewport) -> Self {
        let viewport = Signal::new(initial);
        let breakpoint = viewport.map(Viewport::breakpoint);
        Self {
            viewport,
            breakpoint,
        }
    }

    /// Record a resize.
    pub fn record(&self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            trace!(width, height, "invalid viewport sample dropped");
            return;
        }
        self.viewport.set(Viewport::new(width, height));
    }

    /// Latest dimensions.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    /// Latest inner height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.viewport.with(|v| v.height)
    }

    /// Latest breakpoint.
    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint.get()
    }

    /// Signal of raw dimensions.
    #[must_use]
    pub fn signal(&self) -> &Signal<Viewport> {
        &self.viewport
    }

    /// Signal of the breakpoint; notifies only when the class changes.
    #[must_use]
    pub fn breakpoint_signal(&self) -> &Signal<Breakpoint> {
        &self.breakpoint
    }
}

impl Default for ViewportSampler {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn pointer_starts_unknown() {
        let p = PointerSampler::new();
        assert_eq!(p.latest(), PointerSample::UNKNOWN);
        assert!(p.latest().point().is_none());
    }

    #[test]
    fn pointer_records_every_move() {
        let p = PointerSampler::new();
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let _sub = p.signal().subscribe(move |_| h.set(h.get() + 1));

        for i in 0..10 {
            p.record(f64::from(i), 5.0);
        }
        assert_eq!(hits.get(), 10);
        assert_eq!(p.latest(), PointerSample::at(9.0, 5.0));
    }

    #[test]
    fn pointer_drops_nan() {
        let p = PointerSampler::new();
        p.record(10.0, 20.0);
        p.record(f64::NAN, 30.0);
        assert_eq!(p.latest(), PointerSample::at(10.0, 20.0));
    }

    #[test]
    fn scroll_sampler_containers() {
        let root = ScrollSampler::root();
        let nested = ScrollSampler::nested("carousel");
        assert_eq!(root.container(), &ScrollContainer::Root);
        assert_eq!(
            nested.container(),
            &ScrollContainer::Nested("carousel".into())
        );

        root.record(120.0);
        assert!((root.offset() - 120.0).abs() < f64::EPSILON);
        assert!(nested.offset().abs() < f64::EPSILON);
    }

    #[test]
    fn breakpoint_boundaries() {
        assert_eq!(Breakpoint::from_width(375.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(550.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(551.0), Breakpoint::TabletPortrait);
        assert_eq!(Breakpoint::from_width(768.0), Breakpoint::TabletPortrait);
        assert_eq!(Breakpoint::from_width(1024.0), Breakpoint::TabletLandscape);
        assert_eq!(Breakpoint::from_width(1440.0), Breakpoint::TabletLandscape);
        assert_eq!(Breakpoint::from_width(1600.0), Breakpoint::Laptop);
        assert_eq!(Breakpoint::from_width(1679.0), Breakpoint::Laptop);
        assert_eq!(Breakpoint::from_width(1680.0), Breakpoint::Desktop);
    }

    #[test]
    fn handheld_classes() {
        assert!(Breakpoint::Mobile.is_handheld());
        assert!(Breakpoint::TabletPortrait.is_handheld());
        assert!(!Breakpoint::TabletLandscape.is_handheld());
        assert!(!Breakpoint::Desktop.is_handheld());
    }

    #[test]
    fn breakpoint_signal_only_fires_on_class_change() {
        let vp = ViewportSampler::new(Viewport::new(1920.0, 1080.0));
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let _sub = vp.breakpoint_signal().subscribe(move |_| h.set(h.get() + 1));

        vp.record(1800.0, 1000.0);
        vp.record(1700.0, 1000.0);
        assert_eq!(hits.get(), 0);

        vp.record(700.0, 1000.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(vp.breakpoint(), Breakpoint::TabletPortrait);
        assert!((vp.height() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_viewport_dropped() {
        let vp = ViewportSampler::new(Viewport::new(800.0, 600.0));
        vp.record(-1.0, 600.0);
        assert_eq!(vp.viewport(), Viewport::new(800.0, 600.0));
    }
}
