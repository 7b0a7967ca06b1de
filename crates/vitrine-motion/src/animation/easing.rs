#![forbid(unsafe_code)]

//! Easing curves mapping linear progress `t ∈ [0, 1]` to eased progress.

/// An easing curve.
pub type EasingFn = fn(f64) -> f64;

/// Identity.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Exponential ease-out used for long programmatic scrolls.
///
/// `min(1, 1.001 - 2^(-10t))`: fast departure, a long gentle landing.
#[must_use]
pub fn ease_out_expo(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (1.001 - 2.0_f64.powf(-10.0 * t)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [(&str, EasingFn); 3] = [
        ("linear", linear),
        ("ease_in_out", ease_in_out),
        ("ease_out_expo", ease_out_expo),
    ];

    #[test]
    fn curves_end_at_one() {
        for (name, f) in CURVES {
            assert!((f(1.0) - 1.0).abs() < 1e-9, "{name}(1) = {}", f(1.0));
        }
    }

    #[test]
    fn curves_are_monotone() {
        for (name, f) in CURVES {
            let mut prev = f(0.0);
            for i in 1..=100 {
                let v = f(f64::from(i) / 100.0);
                assert!(v >= prev, "{name} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn expo_starts_near_zero() {
        assert!(ease_out_expo(0.0) < 0.01);
        assert!(ease_out_expo(0.5) > 0.9);
    }

    #[test]
    fn out_of_range_input_clamped() {
        assert!((linear(2.0) - 1.0).abs() < f64::EPSILON);
        assert!(ease_in_out(-1.0).abs() < f64::EPSILON);
    }
}
