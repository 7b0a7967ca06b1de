//! Property-based checks for the motion engines.
//!
//! 1. **Scale bounds**: proximity scale stays within `[min, max]` and never
//!    grows as the pointer moves away along a ray.
//! 2. **Movement idempotence**: sub-threshold jitter never flips
//!    `has_moved`; the first larger delta does, permanently.
//! 3. **Reset**: re-arming always returns to the initial state.
//! 4. **Layout monotonicity**: stacked cards never overlap.
//! 5. **Parallax sign**: a lower driver never yields a lower target, and the
//!    smoothed output moves continuously.

use std::time::Duration;

use proptest::prelude::*;
use vitrine_core::{InputEvent, Point, Rect};
use vitrine_motion::{
    MovementDetector, MovementOptions, MovementState, ParallaxFollower, ParallaxOptions,
    ProximityOptions, StackSpec, parallax_target, proximity_scale, stack_layouts,
};
use web_time::Instant;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn unthrottled() -> MovementOptions {
    MovementOptions {
        sample_throttle: Duration::ZERO,
        ..MovementOptions::default()
    }
}

proptest! {
    #[test]
    fn proximity_scale_within_bounds(
        px in -3000.0f64..3000.0,
        py in -3000.0f64..3000.0,
        left in -1000.0f64..1000.0,
        top in -1000.0f64..1000.0,
        w in 1.0f64..800.0,
        h in 1.0f64..800.0,
        min in 0.0f64..1.0,
        spread in 0.0f64..2.0,
        radius in 1.0f64..1000.0,
    ) {
        let opts = ProximityOptions { max_scale: min + spread, min_scale: min, radius };
        let s = proximity_scale(Point::new(px, py), Rect::new(left, top, w, h), &opts);
        prop_assert!(s >= min - 1e-12);
        prop_assert!(s <= min + spread + 1e-12);
    }

    #[test]
    fn proximity_scale_non_increasing_with_distance(
        angle in 0.0f64..std::f64::consts::TAU,
        d1 in 0.0f64..1000.0,
        extra in 0.0f64..1000.0,
    ) {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let c = rect.center();
        let at = |d: f64| Point::new(c.x + d * angle.cos(), c.y + d * angle.sin());
        let opts = ProximityOptions::default();
        let near = proximity_scale(at(d1), rect, &opts);
        let far = proximity_scale(at(d1 + extra), rect, &opts);
        prop_assert!(far <= near + 1e-12);
    }

    #[test]
    fn sub_threshold_jitter_never_triggers(
        base in 0.0f64..2000.0,
        jitter in proptest::collection::vec(-4.99f64..=4.99, 1..64),
    ) {
        let t0 = Instant::now();
        let mut det = MovementDetector::new(unthrottled(), t0);
        det.on_event(&InputEvent::PointerMove { x: 0.0, y: base }, t0 + ms(2000));
        for (i, dy) in jitter.iter().enumerate() {
            let now = t0 + ms(2001 + i as u64);
            let state = det.on_event(&InputEvent::PointerMove { x: 0.0, y: base + dy }, now);
            prop_assert!(!state.has_moved);
        }
    }

    #[test]
    fn first_large_delta_triggers_and_sticks(
        base in 0.0f64..2000.0,
        delta in 5.001f64..500.0,
        negative in any::<bool>(),
        after in proptest::collection::vec(-1000.0f64..1000.0, 0..32),
    ) {
        let t0 = Instant::now();
        let mut det = MovementDetector::new(unthrottled(), t0);
        det.on_event(&InputEvent::PointerMove { x: 0.0, y: base }, t0 + ms(2000));
        let y = if negative { base - delta } else { base + delta };
        let moved = det.on_event(&InputEvent::PointerMove { x: 0.0, y }, t0 + ms(2001)).has_moved;
        prop_assert!(moved);
        for (i, y) in after.iter().enumerate() {
            let state = det.on_event(&InputEvent::PointerMove { x: 0.0, y: *y }, t0 + ms(2002 + i as u64));
            prop_assert!(state.has_moved && state.warmup_complete);
        }
    }

    #[test]
    fn reset_always_rearms(
        ys in proptest::collection::vec(0.0f64..1000.0, 0..32),
        tap in any::<bool>(),
        reset_at in 0u64..10_000,
    ) {
        let t0 = Instant::now();
        let mut det = MovementDetector::new(unthrottled(), t0);
        for (i, y) in ys.iter().enumerate() {
            det.on_event(&InputEvent::PointerMove { x: 0.0, y: *y }, t0 + ms(1990 + i as u64));
        }
        if tap {
            det.on_event(&InputEvent::Click { x: 0.0, y: 0.0 }, t0 + ms(3000));
        }
        det.reset(t0 + ms(reset_at));
        prop_assert_eq!(det.state(), MovementState::default());
    }

    #[test]
    fn stacked_tops_never_overlap(
        heights in proptest::collection::vec(0.0f64..2000.0, 0..48),
        padding in 0.0f64..1000.0,
        margin_top in 0.0f64..100.0,
        margin_bottom in 0.0f64..100.0,
    ) {
        let spec = StackSpec { padding_top: padding, margin_top, margin_bottom };
        let layouts = stack_layouts(heights.iter().copied(), &spec);
        prop_assert_eq!(layouts.len(), heights.len());
        for pair in layouts.windows(2) {
            prop_assert!(pair[1].top >= pair[0].top + pair[0].height);
        }
    }

    #[test]
    fn parallax_target_is_non_increasing_in_driver(
        vh in 1.0f64..3000.0,
        a in -500.0f64..3500.0,
        b in -500.0f64..3500.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let t_lo = parallax_target(Some(lo), vh, 1500.0);
        let t_hi = parallax_target(Some(hi), vh, 1500.0);
        prop_assert!(t_hi <= t_lo + 1e-9);
        // Above the midpoint the layer moves up, below it moves down.
        if hi > vh / 2.0 + 1e-6 {
            prop_assert!(t_hi < 0.0);
        }
        if lo < vh / 2.0 - 1e-6 {
            prop_assert!(t_lo > 0.0);
        }
    }

    #[test]
    fn parallax_output_is_continuous(drivers in proptest::collection::vec(0.0f64..1000.0, 1..40)) {
        let mut layer = ParallaxFollower::new(ParallaxOptions::default(), 1000.0);
        let mut prev = layer.translation();
        for y in drivers {
            layer.set_driver(Some(y));
            let next = layer.tick(ms(16));
            // A single 16ms frame can cover only part of the largest
            // possible target step (1500px).
            prop_assert!((next - prev).abs() < 1500.0);
            prev = next;
        }
    }
}
