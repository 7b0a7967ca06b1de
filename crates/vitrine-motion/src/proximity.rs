#![forbid(unsafe_code)]

//! Distance-driven emphasis scale.
//!
//! Elements grow as the pointer approaches their center:
//!
//! ```text
//! scale = clamp(max - (distance / radius) · (max - min), min, max)
//! ```
//!
//! Two front ends share that formula:
//!
//! - [`ProximityScale`]: one element, recomputed on every pointer sample.
//! - [`ProximityField`]: many elements, pointer samples coalesced (latest
//!   wins) and every element recomputed once per frame.
//!
//! Neither smooths; layer a [`Spring`](crate::Spring) on the output for that.
//!
//! # Invariants
//!
//! 1. `min_scale <= scale <= max_scale` for every pointer position.
//! 2. Scale is non-increasing in distance from the element center.
//! 3. Unknown pointer, unmounted element, or degenerate bounds: the previous
//!    scale is held.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};
use vitrine_core::{PointerSample, PointerSampler, Point, Rect, Signal, Subscription};

use crate::frame::{FrameControl, FrameHandle, FrameLoop};

/// Scale bounds and falloff radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityOptions {
    /// Scale at the element center (default: 1.0).
    pub max_scale: f64,
    /// Scale at or beyond the radius (default: 0.5).
    pub min_scale: f64,
    /// Distance in pixels over which scale falls from max to min (default: 300).
    pub radius: f64,
}

impl Default for ProximityOptions {
    fn default() -> Self {
        Self {
            max_scale: 1.0,
            min_scale: 0.5,
            radius: 300.0,
        }
    }
}

impl ProximityOptions {
    fn bounds(&self) -> (f64, f64) {
        if self.min_scale <= self.max_scale {
            (self.min_scale, self.max_scale)
        } else {
            (self.max_scale, self.min_scale)
        }
    }
}

/// Scale for an element with `bounds` given the pointer at `pointer`.
#[must_use]
pub fn proximity_scale(pointer: Point, bounds: Rect, options: &ProximityOptions) -> f64 {
    let (min, max) = options.bounds();
    let distance = pointer.distance(bounds.center());
    if options.radius.is_nan() || options.radius <= 0.0 {
        return if distance == 0.0 { max } else { min };
    }
    (max - (distance / options.radius) * (max - min)).clamp(min, max)
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// Source of an element's current bounding box.
///
/// `None` means the element is not mounted.
pub trait Measure {
    /// Current bounds in viewport coordinates.
    fn bounds(&self) -> Option<Rect>;
}

impl<F: Fn() -> Option<Rect>> Measure for F {
    fn bounds(&self) -> Option<Rect> {
        self()
    }
}

/// A host-written bounding box. Clones share the slot.
///
/// The host writes the element's rect on layout and clears it on unmount.
#[derive(Debug, Clone, Default)]
pub struct ElementSlot {
    rect: Rc<Cell<Option<Rect>>>,
}

impl ElementSlot {
    /// Empty (unmounted) slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot already holding `rect`.
    #[must_use]
    pub fn mounted(rect: Rect) -> Self {
        let slot = Self::new();
        slot.mount(rect);
        slot
    }

    /// Record the element's current rect.
    pub fn mount(&self, rect: Rect) {
        self.rect.set(Some(rect));
    }

    /// Mark the element as gone.
    pub fn unmount(&self) {
        self.rect.set(None);
    }
}

impl Measure for ElementSlot {
    fn bounds(&self) -> Option<Rect> {
        self.rect.get()
    }
}

fn measure_usable(measure: &dyn Measure) -> Option<Rect> {
    measure.bounds().filter(|r| !r.is_degenerate())
}

// ---------------------------------------------------------------------------
// Single element
// ---------------------------------------------------------------------------

struct ScaleInner {
    options: ProximityOptions,
    measure: Box<dyn Measure>,
    scale: Signal<f64>,
}

impl ScaleInner {
    fn recompute(&self, sample: &PointerSample) {
        let Some(pointer) = sample.point() else {
            return;
        };
        let Some(bounds) = measure_usable(self.measure.as_ref()) else {
            trace!("proximity target unavailable; scale held");
            return;
        };
        self.scale.set(proximity_scale(pointer, bounds, &self.options));
    }
}

/// Proximity scale for one element, recomputed on every pointer sample.
pub struct ProximityScale {
    inner: Rc<ScaleInner>,
    _sub: Option<Subscription>,
}

impl std::fmt::Debug for ProximityScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityScale")
            .field("options", &self.inner.options)
            .field("scale", &self.inner.scale.get())
            .finish_non_exhaustive()
    }
}

impl ProximityScale {
    /// Unbound tracker; drive it with [`update`](Self::update). Starts at
    /// `min_scale`.
    #[must_use]
    pub fn new(options: ProximityOptions, measure: impl Measure + 'static) -> Self {
        Self {
            inner: Rc::new(ScaleInner {
                options,
                measure: Box::new(measure),
                scale: Signal::new(options.bounds().0),
            }),
            _sub: None,
        }
    }

    /// Tracker following `pointer` until dropped.
    #[must_use]
    pub fn attach(
        options: ProximityOptions,
        measure: impl Measure + 'static,
        pointer: &PointerSampler,
    ) -> Self {
        let mut tracker = Self::new(options, measure);
        tracker.inner.recompute(&pointer.latest());
        let inner = Rc::clone(&tracker.inner);
        tracker._sub = Some(pointer.signal().subscribe(move |s| inner.recompute(s)));
        tracker
    }

    /// Recompute from `sample`.
    pub fn update(&self, sample: &PointerSample) {
        self.inner.recompute(sample);
    }

    /// Latest scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.inner.scale.get()
    }

    /// Scale as a signal.
    #[must_use]
    pub fn signal(&self) -> &Signal<f64> {
        &self.inner.scale
    }
}

// ---------------------------------------------------------------------------
// Many elements
// ---------------------------------------------------------------------------

/// Handle for an element tracked by a [`ProximityField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

struct Tracked {
    id: ElementId,
    measure: Box<dyn Measure>,
    scale: f64,
}

struct FieldInner {
    options: ProximityOptions,
    elements: Vec<Tracked>,
    next_id: u64,
    latest: Option<Point>,
    dirty: bool,
    passes: u64,
}

impl FieldInner {
    /// One pass over every element. Returns the published snapshot.
    fn recompute(&mut self) -> Option<Vec<(ElementId, f64)>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        let pointer = self.latest?;
        self.passes += 1;
        let options = self.options;
        let mut skipped = 0usize;
        for el in &mut self.elements {
            match measure_usable(el.measure.as_ref()) {
                Some(bounds) => el.scale = proximity_scale(pointer, bounds, &options),
                None => skipped += 1,
            }
        }
        trace!(
            elements = self.elements.len(),
            skipped,
            pass = self.passes,
            "proximity field pass"
        );
        Some(self.snapshot())
    }

    fn snapshot(&self) -> Vec<(ElementId, f64)> {
        self.elements.iter().map(|e| (e.id, e.scale)).collect()
    }
}

/// Proximity scale for many elements at once.
///
/// Pointer samples only mark the field dirty; the recomputation happens at
/// most once per frame (or per explicit [`flush`](Self::flush)), against the
/// latest sample. With dozens of tracked cards and a high-rate pointer, the
/// cost is one pass per frame instead of one per element per event.
pub struct ProximityField {
    inner: Rc<RefCell<FieldInner>>,
    scales: Signal<Vec<(ElementId, f64)>>,
    _sub: Option<Subscription>,
    _frame: Option<FrameHandle>,
}

impl std::fmt::Debug for ProximityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ProximityField")
            .field("elements", &inner.elements.len())
            .field("passes", &inner.passes)
            .finish_non_exhaustive()
    }
}

impl ProximityField {
    /// Unbound field; feed it with [`record`](Self::record) and
    /// [`flush`](Self::flush).
    #[must_use]
    pub fn new(options: ProximityOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FieldInner {
                options,
                elements: Vec::new(),
                next_id: 0,
                latest: None,
                dirty: false,
                passes: 0,
            })),
            scales: Signal::new(Vec::new()),
            _sub: None,
            _frame: None,
        }
    }

    /// Field following `pointer`, recomputed on frames of `frames`.
    #[must_use]
    pub fn attach(options: ProximityOptions, pointer: &PointerSampler, frames: &FrameLoop) -> Self {
        let mut field = Self::new(options);
        field.record(&pointer.latest());

        let inner = Rc::clone(&field.inner);
        field._sub = Some(pointer.signal().subscribe(move |s| {
            if let Some(p) = s.point() {
                let mut inner = inner.borrow_mut();
                inner.latest = Some(p);
                inner.dirty = true;
            }
        }));

        let inner = Rc::clone(&field.inner);
        let scales = field.scales.clone();
        field._frame = Some(frames.request(move |_| {
            let snapshot = inner.borrow_mut().recompute();
            if let Some(snapshot) = snapshot {
                scales.set(snapshot);
            }
            FrameControl::Continue
        }));
        field
    }

    /// Start tracking an element. Its scale starts at `min_scale` and is
    /// computed on the next pass.
    pub fn track(&self, measure: impl Measure + 'static) -> ElementId {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            let id = ElementId(inner.next_id);
            inner.next_id += 1;
            let scale = inner.options.bounds().0;
            inner.elements.push(Tracked {
                id,
                measure: Box::new(measure),
                scale,
            });
            inner.dirty = true;
            debug!(id = id.0, total = inner.elements.len(), "proximity element tracked");
            (id, inner.snapshot())
        };
        self.scales.set(snapshot.1);
        snapshot.0
    }

    /// Stop tracking an element. Unknown ids are ignored.
    pub fn untrack(&self, id: ElementId) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.elements.len();
            inner.elements.retain(|e| e.id != id);
            if inner.elements.len() == before {
                return;
            }
            inner.snapshot()
        };
        self.scales.set(snapshot);
    }

    /// Record a pointer sample. Unknown samples are ignored.
    pub fn record(&self, sample: &PointerSample) {
        if let Some(p) = sample.point() {
            let mut inner = self.inner.borrow_mut();
            inner.latest = Some(p);
            inner.dirty = true;
        }
    }

    /// Recompute now if anything changed since the last pass.
    pub fn flush(&self) {
        let snapshot = self.inner.borrow_mut().recompute();
        if let Some(snapshot) = snapshot {
            self.scales.set(snapshot);
        }
    }

    /// Latest scale of one element.
    #[must_use]
    pub fn scale_of(&self, id: ElementId) -> Option<f64> {
        self.inner
            .borrow()
            .elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.scale)
    }

    /// Every tracked element's scale, in tracking order.
    #[must_use]
    pub fn scales(&self) -> &Signal<Vec<(ElementId, f64)>> {
        &self.scales
    }

    /// Tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().elements.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recomputation passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.inner.borrow().passes
    }
}
