#![forbid(unsafe_code)]

//! Input hub: the single entry point for raw events.
//!
//! Host glue calls [`InputHub::dispatch`] for every platform event. The hub
//! updates the matching sampler and republishes the stamped event on
//! [`InputHub::events`] for consumers that need arrival times (throttled or
//! time-gated engines such as the movement detector).
//!
//! Within one dimension, samples are published in dispatch order. Nothing is
//! promised about the interleaving of different dimensions.

use std::cell::Cell;

use tracing::trace;
use web_time::Instant;

use crate::event::{InputEvent, TimedEvent};
use crate::reactive::Signal;
use crate::sampler::{PointerSampler, ScrollSampler, Viewport, ViewportSampler};

/// Fans raw events out to the pointer, root-scroll, and viewport samplers.
#[derive(Debug)]
pub struct InputHub {
    pointer: PointerSampler,
    scroll: ScrollSampler,
    viewport: ViewportSampler,
    taps: Signal<u64>,
    events: Signal<Option<TimedEvent>>,
    next_seq: Cell<u64>,
}

impl InputHub {
    /// Create a hub for a viewport of the given initial size.
    #[must_use]
    pub fn new(initial: Viewport) -> Self {
        Self {
            pointer: PointerSampler::new(),
            scroll: ScrollSampler::root(),
            viewport: ViewportSampler::new(initial),
            taps: Signal::new(0),
            events: Signal::new(None),
            next_seq: Cell::new(0),
        }
    }

    /// Route one event, stamped with its arrival time.
    pub fn dispatch(&self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer.record(x, y),
            InputEvent::Scroll { offset } => self.scroll.record(offset),
            InputEvent::Resize { width, height } => self.viewport.record(width, height),
            InputEvent::Click { .. } | InputEvent::TouchStart { .. } => {
                self.taps.update(|n| *n = n.wrapping_add(1));
            }
            // Consumed by scroll drivers through the event stream.
            InputEvent::TouchMove { .. } | InputEvent::Wheel { .. } => {}
        }

        let seq = self.next_seq.get();
        self.next_seq.set(seq.wrapping_add(1));
        trace!(seq, ?event, "input dispatched");
        self.events.set(Some(TimedEvent {
            seq,
            at: now,
            event,
        }));
    }

    /// Pointer sampler.
    #[must_use]
    pub fn pointer(&self) -> &PointerSampler {
        &self.pointer
    }

    /// Root scroll sampler.
    #[must_use]
    pub fn scroll(&self) -> &ScrollSampler {
        &self.scroll
    }

    /// Viewport sampler.
    #[must_use]
    pub fn viewport(&self) -> &ViewportSampler {
        &self.viewport
    }

    /// Running count of discrete click / touch-start events.
    #[must_use]
    pub fn taps(&self) -> &Signal<u64> {
        &self.taps
    }

    /// Every dispatched event with its timestamp; `None` before the first.
    #[must_use]
    pub fn events(&self) -> &Signal<Option<TimedEvent>> {
        &self.events
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{Breakpoint, PointerSample};
    use std::rc::Rc;

    #[test]
    fn routes_to_samplers() {
        let hub = InputHub::new(Viewport::new(1920.0, 1080.0));
        let now = Instant::now();

        hub.dispatch(InputEvent::PointerMove { x: 4.0, y: 8.0 }, now);
        hub.dispatch(InputEvent::Scroll { offset: 300.0 }, now);
        hub.dispatch(
            InputEvent::Resize {
                width: 500.0,
                height: 900.0,
            },
            now,
        );

        assert_eq!(hub.pointer().latest(), PointerSample::at(4.0, 8.0));
        assert!((hub.scroll().offset() - 300.0).abs() < f64::EPSILON);
        assert_eq!(hub.viewport().breakpoint(), Breakpoint::Mobile);
    }

    #[test]
    fn taps_count_clicks_and_touches() {
        let hub = InputHub::default();
        let now = Instant::now();
        hub.dispatch(InputEvent::Click { x: 0.0, y: 0.0 }, now);
        hub.dispatch(InputEvent::TouchStart { x: 0.0, y: 0.0 }, now);
        hub.dispatch(InputEvent::PointerMove { x: 1.0, y: 1.0 }, now);
        assert_eq!(hub.taps().get(), 2);
    }

    #[test]
    fn identical_events_each_notify() {
        let hub = InputHub::default();
        let seen = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&seen);
        let _sub = hub.events().subscribe(move |_| s.set(s.get() + 1));

        let now = Instant::now();
        hub.dispatch(InputEvent::Click { x: 1.0, y: 1.0 }, now);
        hub.dispatch(InputEvent::Click { x: 1.0, y: 1.0 }, now);
        assert_eq!(seen.get(), 2);
    }
}
