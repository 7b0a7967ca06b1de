#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! These mirror the subset of DOM events the motion engines care about.
//! Host glue (a wasm bridge, a test driver) converts platform events into
//! [`InputEvent`] and hands them to an [`InputHub`](crate::InputHub).

use web_time::Instant;

/// A raw input event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to `(x, y)`.
    PointerMove {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// The root scroll container moved to `offset`.
    Scroll {
        /// Vertical scroll offset in pixels.
        offset: f64,
    },
    /// The viewport was resized.
    Resize {
        /// Inner width in pixels.
        width: f64,
        /// Inner height in pixels.
        height: f64,
    },
    /// A primary-button click.
    Click {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// A touch began.
    TouchStart {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// A touch point moved.
    TouchMove {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// A wheel notch or trackpad swipe, before any smooth-scroll driver
    /// turns it into an offset.
    Wheel {
        /// Vertical delta in pixels.
        delta_y: f64,
    },
}

impl InputEvent {
    /// Whether this is a discrete engagement action (click or tap).
    #[must_use]
    pub const fn is_discrete(&self) -> bool {
        matches!(self, Self::Click { .. } | Self::TouchStart { .. })
    }

    /// Whether the user is actively trying to scroll (wheel or touch).
    #[must_use]
    pub const fn is_scroll_intent(&self) -> bool {
        matches!(
            self,
            Self::Wheel { .. } | Self::TouchStart { .. } | Self::TouchMove { .. }
        )
    }
}

/// An event stamped with its arrival time and a monotonically increasing
/// sequence number.
///
/// The sequence number makes two otherwise-identical events distinct, so a
/// [`Signal<Option<TimedEvent>>`](crate::Signal) notifies for each one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    /// Dispatch order.
    pub seq: u64,
    /// Arrival time.
    pub at: Instant,
    /// The event itself.
    pub event: InputEvent,
}
