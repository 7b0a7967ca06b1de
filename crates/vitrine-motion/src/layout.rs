#![forbid(unsafe_code)]

//! Card layout pass and per-card sizing.
//!
//! Pure geometry for vertically stacked, scroll-driven card collections.
//! [`stack_layouts`] turns measured card heights into ordered
//! [`CardLayout`]s; [`frame_for`] sizes one card from its distance to the
//! viewport center at a given scroll offset.
//!
//! # Invariants
//!
//! 1. `top[i + 1] >= top[i] + height[i]` for every pass.
//! 2. `range.min <= width <= range.max` for every frame.
//! 3. A card whose center sits on the viewport center gets `range.max`.

use vitrine_core::Breakpoint;

/// Geometry of one stacked card, in scroll-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardLayout {
    /// Offset of the card's top edge from the content top.
    pub top: f64,
    /// Card height.
    pub height: f64,
}

impl CardLayout {
    /// Vertical center.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Spacing applied during a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackSpec {
    /// Space above the first card. Carousels use half the container height
    /// so the first card can be centered.
    pub padding_top: f64,
    /// Margin above each card.
    pub margin_top: f64,
    /// Margin below each card.
    pub margin_bottom: f64,
}

impl StackSpec {
    /// Spacing for a centered carousel in a container of `container_height`.
    #[must_use]
    pub fn centered(container_height: f64, margin_top: f64, margin_bottom: f64) -> Self {
        Self {
            padding_top: container_height / 2.0,
            margin_top,
            margin_bottom,
        }
    }
}

/// Stack cards of the given heights top to bottom.
///
/// Negative or non-finite heights and margins count as zero, so a
/// half-measured card never pulls the next one upward.
#[must_use]
pub fn stack_layouts<I>(heights: I, spec: &StackSpec) -> Vec<CardLayout>
where
    I: IntoIterator<Item = f64>,
{
    let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let gap = sanitize(spec.margin_top) + sanitize(spec.margin_bottom);
    let mut top = sanitize(spec.padding_top);
    heights
        .into_iter()
        .map(|h| {
            let height = sanitize(h);
            let layout = CardLayout { top, height };
            top += height + gap;
            layout
        })
        .collect()
}

/// Height of a 16:9 card of `width`.
#[must_use]
pub fn aspect_height(width: f64) -> f64 {
    width * 9.0 / 16.0
}

/// Scroll offset that puts `layout`'s center on the container's center.
#[must_use]
pub fn center_offset(layout: &CardLayout, container_height: f64) -> f64 {
    layout.top - container_height / 2.0 + layout.height / 2.0
}

/// Card width bounds, in viewport-width units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    /// Width far from center.
    pub min: f64,
    /// Width at center.
    pub max: f64,
}

impl SizeRange {
    /// Gallery carousel on wide viewports: 30vw to 50vw.
    pub const DESKTOP: Self = Self {
        min: 30.0,
        max: 50.0,
    };

    /// Gallery carousel on handheld viewports: 50vw to 100vw.
    pub const HANDHELD: Self = Self {
        min: 50.0,
        max: 100.0,
    };

    /// Featured-project list on handheld viewports: 40vw to 100vw.
    pub const FEATURED_HANDHELD: Self = Self {
        min: 40.0,
        max: 100.0,
    };

    /// Gallery carousel range for `breakpoint`.
    #[must_use]
    pub fn carousel(breakpoint: Breakpoint) -> Self {
        if breakpoint.is_handheld() {
            Self::HANDHELD
        } else {
            Self::DESKTOP
        }
    }

    /// Interpolate from `max` (t = 0) to `min` (t = 1).
    #[must_use]
    pub fn lerp_down(&self, t: f64) -> f64 {
        self.max - t.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Distance-to-size mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSizing {
    /// Width bounds.
    pub range: SizeRange,
    /// Fraction of the viewport height over which width falls from max to
    /// min (default: 0.5).
    pub scale_threshold: f64,
    /// Fraction of the viewport height within which a card is active
    /// (default: 0.1).
    pub active_threshold: f64,
    /// Opacity far from center (default: 1.0, no fade).
    pub min_opacity: f64,
}

impl Default for CardSizing {
    fn default() -> Self {
        Self::new(SizeRange::DESKTOP)
    }
}

impl CardSizing {
    /// Default thresholds over `range`.
    #[must_use]
    pub fn new(range: SizeRange) -> Self {
        Self {
            range,
            scale_threshold: 0.5,
            active_threshold: 0.1,
            min_opacity: 1.0,
        }
    }

    /// Set the opacity far from center (builder pattern).
    #[must_use]
    pub fn with_min_opacity(mut self, opacity: f64) -> Self {
        self.min_opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Computed presentation of one card at one scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFrame {
    /// Width in viewport-width units.
    pub width: f64,
    /// Distance from center over the falloff span, in `[0, 1]`.
    pub normalized_distance: f64,
    /// Target opacity.
    pub opacity: f64,
    /// Close enough to center to drop the overlay.
    pub active: bool,
}

/// Size `layout` for the viewport scrolled to `scroll`.
///
/// `None` when the viewport has no height; callers keep the previous frame.
#[must_use]
pub fn frame_for(
    layout: &CardLayout,
    scroll: f64,
    viewport_height: f64,
    sizing: &CardSizing,
) -> Option<CardFrame> {
    if !(viewport_height.is_finite() && viewport_height > 0.0) || !scroll.is_finite() {
        return None;
    }
    let distance = (layout.center() - (viewport_height / 2.0 + scroll)).abs();
    let span = viewport_height * sizing.scale_threshold;
    let normalized_distance = if span > 0.0 {
        (distance / span).min(1.0)
    } else if distance == 0.0 {
        0.0
    } else {
        1.0
    };
    let min_opacity = sizing.min_opacity.clamp(0.0, 1.0);
    Some(CardFrame {
        width: sizing.range.lerp_down(normalized_distance),
        normalized_distance,
        opacity: 1.0 - normalized_distance * (1.0 - min_opacity),
        active: distance < viewport_height * sizing.active_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_accumulates_height_and_margins() {
        let spec = StackSpec {
            padding_top: 250.0,
            margin_top: 4.0,
            margin_bottom: 6.0,
        };
        let layouts = stack_layouts([100.0, 50.0, 80.0], &spec);
        assert_eq!(
            layouts,
            vec![
                CardLayout { top: 250.0, height: 100.0 },
                CardLayout { top: 360.0, height: 50.0 },
                CardLayout { top: 420.0, height: 80.0 },
            ]
        );
    }

    #[test]
    fn empty_stack() {
        assert!(stack_layouts(std::iter::empty(), &StackSpec::default()).is_empty());
    }

    #[test]
    fn bad_heights_count_as_zero() {
        let layouts = stack_layouts([f64::NAN, -20.0, 10.0], &StackSpec::default());
        assert!(layouts.iter().all(|l| l.top.abs() < f64::EPSILON));
        assert!((layouts[2].height - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centered_padding_is_half_container() {
        let spec = StackSpec::centered(900.0, 0.0, 0.0);
        assert!((spec.padding_top - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centering_offset_places_card_mid_container() {
        let card = CardLayout { top: 1200.0, height: 300.0 };
        let offset = center_offset(&card, 800.0);
        assert!((offset - 950.0).abs() < f64::EPSILON);
        // With that offset, the card center equals the viewport center.
        assert!((card.center() - (offset + 400.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn aspect_is_sixteen_by_nine() {
        assert!((aspect_height(1600.0) - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centered_card_is_full_width_and_active() {
        let card = CardLayout { top: 200.0, height: 200.0 };
        let frame = frame_for(&card, 50.0, 500.0, &CardSizing::default());
        let frame = frame.unwrap_or_else(|| panic!("frame expected"));
        assert!(frame.normalized_distance.abs() < f64::EPSILON);
        assert!((frame.width - 50.0).abs() < f64::EPSILON);
        assert!(frame.active);
        assert!((frame.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn far_card_is_min_width_and_inactive() {
        let card = CardLayout { top: 5000.0, height: 200.0 };
        let frame = frame_for(&card, 0.0, 500.0, &CardSizing::new(SizeRange::HANDHELD))
            .unwrap_or_else(|| panic!("frame expected"));
        assert!((frame.normalized_distance - 1.0).abs() < f64::EPSILON);
        assert!((frame.width - 50.0).abs() < f64::EPSILON);
        assert!(!frame.active);
    }

    #[test]
    fn opacity_fades_when_configured() {
        let sizing = CardSizing::default().with_min_opacity(0.2);
        let card = CardLayout { top: 5000.0, height: 0.0 };
        let frame = frame_for(&card, 0.0, 500.0, &sizing).unwrap_or_else(|| panic!("frame expected"));
        assert!((frame.opacity - 0.2).abs() < 1e-9);
    }

    #[test]
    fn active_band_is_a_tenth_of_the_viewport() {
        let sizing = CardSizing::default();
        // Viewport center at 250; card center 49px away.
        let near = CardLayout { top: 199.0, height: 200.0 };
        let edge = CardLayout { top: 200.0, height: 200.0 };
        assert!(frame_for(&near, 0.0, 500.0, &sizing).is_some_and(|f| f.active));
        // Exactly 50px away is outside the strict band.
        assert!(frame_for(&edge, 0.0, 500.0, &sizing).is_some_and(|f| !f.active));
    }

    #[test]
    fn zero_viewport_yields_nothing() {
        let card = CardLayout { top: 0.0, height: 10.0 };
        assert!(frame_for(&card, 0.0, 0.0, &CardSizing::default()).is_none());
    }

    #[test]
    fn breakpoint_ranges() {
        assert_eq!(SizeRange::carousel(Breakpoint::Mobile), SizeRange::HANDHELD);
        assert_eq!(SizeRange::carousel(Breakpoint::TabletPortrait), SizeRange::HANDHELD);
        assert_eq!(SizeRange::carousel(Breakpoint::Laptop), SizeRange::DESKTOP);
    }
}
