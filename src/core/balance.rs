//! Shared numeric helpers used by the catalog formulas and the engine.
//!
//! Every floor or ceiling taken over an accumulated fractional value goes
//! through [`floor_eps`] or [`ceil_eps`] so that values landing exactly on an
//! integer boundary are not rounded the wrong way by float drift.

use crate::core::constants::{EPSILON, LEVEL_CURVE_SCALE};

// =============================================================================
// ROUNDING
// =============================================================================

/// Floor biased up by [`EPSILON`].
pub fn floor_eps(value: f64) -> f64 {
    (value + EPSILON).floor()
}

/// Ceiling biased down by [`EPSILON`].
pub fn ceil_eps(value: f64) -> f64 {
    (value - EPSILON).ceil()
}

/// Round to three significant digits.
pub fn precision3(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let digits = 2.0 - value.abs().log10().floor();
    let factor = 10f64.powf(digits.abs());
    if digits >= 0.0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    }
}

// =============================================================================
// SEQUENCES & CURVES
// =============================================================================

/// Fibonacci sequence starting 1, 1, 2, 3, 5, ...
pub fn fibonacci(n: u64) -> f64 {
    let (mut a, mut b) = (1.0_f64, 0.0_f64);
    for _ in 0..=n {
        let previous = a;
        a += b;
        b = previous;
    }
    b
}

/// Level reached with the given accumulated experience.
///
/// Level `L` costs `LEVEL_CURVE_SCALE * L * (L + 1) / 2` experience in total,
/// so this is the inverse of that triangular curve.
pub fn level_from_experience(experience: f64) -> f64 {
    let experience = experience.max(0.0);
    floor_eps(((8.0 * experience / LEVEL_CURVE_SCALE + 1.0).sqrt() - 1.0) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_eps_rescues_drift_below_integer() {
        assert_eq!(floor_eps(2.9999999), 3.0);
        assert_eq!(floor_eps(2.5), 2.0);
        assert_eq!(floor_eps(0.0), 0.0);
    }

    #[test]
    fn test_ceil_eps_rescues_drift_above_integer() {
        assert_eq!(ceil_eps(3.0000001), 3.0);
        assert_eq!(ceil_eps(2.5), 3.0);
        // Zero minus epsilon ceils to (negative) zero
        assert_eq!(ceil_eps(0.0), 0.0);
    }

    #[test]
    fn test_fibonacci_sequence() {
        let seq: Vec<f64> = (0..8).map(fibonacci).collect();
        assert_eq!(seq, vec![1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0]);
    }

    #[test]
    fn test_precision3() {
        assert!((precision3(1.2) - 1.2).abs() < 1e-9);
        assert!((precision3(1.44) - 1.44).abs() < 1e-9);
        assert!((precision3(1.728) - 1.73).abs() < 1e-9);
        assert!((precision3(123456.0) - 123000.0).abs() < 1e-6);
        assert_eq!(precision3(0.0), 0.0);
    }

    #[test]
    fn test_level_curve_round_trips_at_boundaries() {
        for level in 0..50u32 {
            let exp = LEVEL_CURVE_SCALE * f64::from(level * (level + 1)) / 2.0;
            assert_eq!(level_from_experience(exp), level as f64);
            if level > 0 {
                assert_eq!(level_from_experience(exp - 1.0), (level - 1) as f64);
            }
        }
    }

    #[test]
    fn test_level_from_negative_experience_is_zero() {
        assert_eq!(level_from_experience(-10.0), 0.0);
    }
}
