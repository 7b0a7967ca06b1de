#![forbid(unsafe_code)]

//! Scroll-driven card carousel.
//!
//! [`CardCarousel`] keeps the layout pass for a vertical card stack and
//! recomputes every card's [`CardFrame`] whenever the scroll offset or the
//! viewport changes. Two small gates sit next to it:
//!
//! - [`LoadGate`]: counts media load callbacks so the layout pass runs only
//!   once every card has its final height.
//! - [`CenteringGuard`]: lets the programmatic scroll to a selected card
//!   fire at most once per selection, even if layout recalculates again.
//!
//! # Invariants
//!
//! 1. With zero cards or a zero viewport height, frames are left untouched.
//! 2. [`LoadGate::mark_loaded`] returns `true` exactly once per arming.
//! 3. [`CenteringGuard::take`] yields a selection at most once until
//!    [`CenteringGuard::select`] is called with a different one.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, trace};
use vitrine_core::{ScrollSampler, Signal, Subscriptions, ViewportSampler};

use crate::layout::{CardFrame, CardLayout, CardSizing, StackSpec, center_offset, frame_for, stack_layouts};
use crate::smooth_scroll::{ScrollOptions, SmoothScroller};

// ---------------------------------------------------------------------------
// LoadGate
// ---------------------------------------------------------------------------

/// Completion counter for asynchronously loading media.
#[derive(Debug, Clone, Default)]
pub struct LoadGate {
    expected: usize,
    loaded: usize,
    fired: bool,
}

impl LoadGate {
    /// Gate expecting `expected` load callbacks. A gate expecting nothing is
    /// complete from the start and never fires.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            loaded: 0,
            fired: expected == 0,
        }
    }

    /// Re-arm for a fresh set of `expected` loads.
    pub fn arm(&mut self, expected: usize) {
        *self = Self::new(expected);
    }

    /// Record one load. Returns `true` on the call that completes the set.
    pub fn mark_loaded(&mut self) -> bool {
        self.loaded = self.loaded.saturating_add(1);
        if !self.fired && self.loaded >= self.expected {
            self.fired = true;
            debug!(loaded = self.loaded, "media load gate complete");
            return true;
        }
        false
    }

    /// Whether every expected load has arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.loaded >= self.expected
    }

    /// Loads recorded since arming.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.loaded
    }
}

// ---------------------------------------------------------------------------
// CenteringGuard
// ---------------------------------------------------------------------------

/// One-shot latch for "scroll the selected card into the center".
#[derive(Debug, Clone, Default)]
pub struct CenteringGuard {
    selection: Option<usize>,
    done: bool,
}

impl CenteringGuard {
    /// Guard with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the selection. A different selection re-arms the guard.
    pub fn select(&mut self, selection: Option<usize>) {
        if selection != self.selection {
            self.selection = selection;
            self.done = false;
        }
    }

    /// Re-arm for the current selection (the carousel was reopened).
    pub fn rearm(&mut self) {
        self.done = false;
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Whether the guard has already fired for this selection.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.done
    }

    /// Yield the selection if it has not been centered yet.
    pub fn take(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let selection = self.selection?;
        self.done = true;
        Some(selection)
    }
}

/// Flat card index of gallery image `position` of project `project`, given
/// each project's gallery length in display order.
#[must_use]
pub fn selected_gallery_index(gallery_lens: &[usize], project: usize, position: usize) -> Option<usize> {
    let len = *gallery_lens.get(project)?;
    if position >= len {
        return None;
    }
    Some(gallery_lens[..project].iter().sum::<usize>() + position)
}

// ---------------------------------------------------------------------------
// CardCarousel
// ---------------------------------------------------------------------------

/// Layout and sizing state for one scroll-driven card stack.
#[derive(Debug, Clone)]
pub struct CardCarousel {
    sizing: CardSizing,
    layouts: Vec<CardLayout>,
    frames: Vec<CardFrame>,
    viewport_height: f64,
    scroll: f64,
    loads: LoadGate,
    centering: CenteringGuard,
}

impl CardCarousel {
    /// Empty carousel.
    #[must_use]
    pub fn new(sizing: CardSizing, viewport_height: f64) -> Self {
        Self {
            sizing,
            layouts: Vec::new(),
            frames: Vec::new(),
            viewport_height,
            scroll: 0.0,
            loads: LoadGate::default(),
            centering: CenteringGuard::new(),
        }
    }

    /// Current layout pass.
    #[must_use]
    pub fn layouts(&self) -> &[CardLayout] {
        &self.layouts
    }

    /// Latest frames, one per card.
    #[must_use]
    pub fn frames(&self) -> &[CardFrame] {
        &self.frames
    }

    /// Sizing in effect.
    #[must_use]
    pub fn sizing(&self) -> &CardSizing {
        &self.sizing
    }

    /// Index of the card currently inside the active band, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.frames.iter().position(|f| f.active)
    }

    /// Run a layout pass over measured card heights.
    ///
    /// An empty measurement (container not mounted yet) keeps the previous
    /// pass, and so does a zero-height viewport: layouts and frames are
    /// only replaced together.
    pub fn relayout<I>(&mut self, heights: I, spec: &StackSpec) -> bool
    where
        I: IntoIterator<Item = f64>,
    {
        let layouts = stack_layouts(heights, spec);
        if layouts.is_empty() {
            trace!("carousel layout skipped: no cards");
            return false;
        }
        let Some(frames) = self.frames_for(&layouts) else {
            trace!(cards = layouts.len(), "carousel layout deferred: viewport has no height");
            return false;
        };
        debug!(cards = layouts.len(), "carousel layout pass");
        self.layouts = layouts;
        self.frames = frames;
        true
    }

    /// Switch sizing (breakpoint change) and recompute.
    pub fn set_sizing(&mut self, sizing: CardSizing) -> bool {
        self.sizing = sizing;
        self.recompute()
    }

    /// New viewport height; recompute.
    pub fn set_viewport_height(&mut self, height: f64) -> bool {
        if !height.is_finite() || height < 0.0 {
            return false;
        }
        self.viewport_height = height;
        self.recompute()
    }

    /// New scroll offset; recompute. Returns whether frames changed.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        if !offset.is_finite() {
            return false;
        }
        self.scroll = offset;
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        if self.layouts.is_empty() {
            return false;
        }
        match self.frames_for(&self.layouts) {
            Some(next) if next != self.frames => {
                self.frames = next;
                true
            }
            _ => false,
        }
    }

    fn frames_for(&self, layouts: &[CardLayout]) -> Option<Vec<CardFrame>> {
        layouts
            .iter()
            .map(|l| frame_for(l, self.scroll, self.viewport_height, &self.sizing))
            .collect()
    }

    // -- media loading ------------------------------------------------------

    /// Expect `total` media load callbacks before the next layout pass.
    pub fn begin_loading(&mut self, total: usize) {
        self.loads.arm(total);
    }

    /// Record one media load. Returns `true` once all have arrived; the
    /// caller should measure and [`relayout`](Self::relayout) then.
    pub fn mark_loaded(&mut self) -> bool {
        self.loads.mark_loaded()
    }

    /// The media gate.
    #[must_use]
    pub fn loads(&self) -> &LoadGate {
        &self.loads
    }

    // -- selection ----------------------------------------------------------

    /// Select a card to center. A new selection re-arms centering.
    pub fn select(&mut self, index: Option<usize>) {
        self.centering.select(index);
    }

    /// Reopen: re-arm centering and the media gate for `total` cards.
    pub fn reopen(&mut self, total: usize) {
        self.centering.rearm();
        self.loads.arm(total);
    }

    /// The centering latch.
    #[must_use]
    pub fn centering(&self) -> &CenteringGuard {
        &self.centering
    }

    /// Scroll offset that centers the selection, consuming the latch.
    ///
    /// `None` if nothing is selected, the latch already fired, or the
    /// selection has no layout yet (the latch stays armed in that case).
    pub fn take_centering_target(&mut self, container_height: f64) -> Option<f64> {
        if self.centering.has_fired() {
            return None;
        }
        let index = self.centering.selection()?;
        let layout = *self.layouts.get(index)?;
        self.centering.take()?;
        Some(center_offset(&layout, container_height))
    }

    /// Issue the one-time programmatic scroll to the selection.
    ///
    /// Returns whether a scroll was started.
    pub fn center_selected(
        &mut self,
        scroller: &mut SmoothScroller,
        container_height: f64,
        options: ScrollOptions,
    ) -> bool {
        let Some(target) = self.take_centering_target(container_height) else {
            return false;
        };
        info!(
            index = self.centering.selection().unwrap_or_default(),
            target, "centering selected card"
        );
        scroller.scroll_to(target, options);
        true
    }

    /// Wire to live scroll and viewport signals.
    pub fn bind(self, scroll: &ScrollSampler, viewport: &ViewportSampler) -> CarouselBinding {
        let carousel = Rc::new(RefCell::new(self));
        let frames = Signal::new(Vec::new());
        {
            let mut c = carousel.borrow_mut();
            c.viewport_height = viewport.height();
            c.scroll = scroll.offset();
            c.recompute();
            frames.set(c.frames.clone());
        }

        let mut subs = Subscriptions::new();
        let (c, out) = (Rc::clone(&carousel), frames.clone());
        subs.add(scroll.signal().subscribe(move |offset| {
            let next = {
                let mut c = c.borrow_mut();
                c.on_scroll(*offset).then(|| c.frames.clone())
            };
            if let Some(next) = next {
                out.set(next);
            }
        }));

        let (c, out) = (Rc::clone(&carousel), frames.clone());
        subs.add(viewport.signal().subscribe(move |vp| {
            let next = {
                let mut c = c.borrow_mut();
                c.set_viewport_height(vp.height).then(|| c.frames.clone())
            };
            if let Some(next) = next {
                out.set(next);
            }
        }));

        CarouselBinding {
            carousel,
            frames,
            _subs: subs,
        }
    }
}

/// A [`CardCarousel`] following live scroll and viewport signals.
#[derive(Debug)]
pub struct CarouselBinding {
    carousel: Rc<RefCell<CardCarousel>>,
    frames: Signal<Vec<CardFrame>>,
    _subs: Subscriptions,
}

impl CarouselBinding {
    /// Frames, published whenever any card's frame changes.
    #[must_use]
    pub fn frames(&self) -> &Signal<Vec<CardFrame>> {
        &self.frames
    }

    /// Read the carousel.
    pub fn with<R>(&self, f: impl FnOnce(&CardCarousel) -> R) -> R {
        f(&self.carousel.borrow())
    }

    /// Mutate the carousel (relayout, select, load tracking) and publish
    /// the resulting frames.
    pub fn update<R>(&self, f: impl FnOnce(&mut CardCarousel) -> R) -> R {
        let (result, frames) = {
            let mut c = self.carousel.borrow_mut();
            let result = f(&mut c);
            (result, c.frames.clone())
        };
        self.frames.set(frames);
        result
    }
}
