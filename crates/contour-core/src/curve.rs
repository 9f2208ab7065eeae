//! Closed-form curve solver for exponential envelope segments.
//!
//! Every curved segment is a first-order recurrence evaluated once per sample:
//!
//! ```text
//! level[n+1] = level[n] + rate * (target - level[n])
//! ```
//!
//! [`solve_curve`] picks `rate` and `target` so that the recurrence travels
//! from the current level to the segment's destination in the number of
//! samples implied by the rate control, and [`CurveCoefficients::contains`]
//! detects the sample at which the destination has been passed.
//!
//! # Curve Shape
//!
//! The curve amount controls how much of an exponential is used:
//!
//! | Curve amount | Time constants spanned | Shape |
//! |--------------|------------------------|-------|
//! | `1.0` | 10 | Strongly curved, concave-down (charging) |
//! | `0.1` | 1 | Gently curved |
//! | `0.0` | 0.001 | Practically linear |
//! | `-1.0` | 10 | Strongly curved, concave-up (inverted) |
//!
//! The asymptote is rescaled so that the curve lands exactly on the
//! destination after the requested number of time constants, which means
//! the recurrence never needs to converge; it simply crosses the boundary.
//!
//! # Rate Law
//!
//! Rates are voltage-like controls where `1.0` corresponds to 10 V. The
//! voltage maps exponentially to the time taken for a full-scale swing:
//! 0 V = 1 ms, 10 V = 10 s (see [`voltage_to_time`]).

use libm::{expm1, fabs, pow};

/// Fixed ceiling of the envelope. Levels above it end the active segment.
pub const PEAK_LEVEL: f64 = 1.0;

/// Upper clamp applied to rate controls before solving.
pub const MAX_RATE: f64 = 2.0;

/// Smallest distance to the destination that still produces a curve.
///
/// Segments shorter than this are skipped on the next sample.
pub const MIN_DELTA_Y: f64 = 1e-6;

/// Floor on the number of time constants a segment spans.
pub const MIN_TIME_CONSTANTS: f64 = 0.001;

/// Time constants spanned at a curve amount of ±1.0.
const TIME_CONSTANTS_PER_CURVE: f64 = 10.0;

/// Volts represented by a rate control value of 1.0.
const VOLTS_PER_UNIT: f64 = 10.0;

/// Per-sample recurrence parameters for one envelope segment.
///
/// A segment completes when the level leaves `[legal_low, PEAK_LEVEL]`.
/// A `rate` of zero is a steady state that never leaves that window on
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurveCoefficients {
    /// Lower completion boundary.
    pub legal_low: f64,
    /// Per-sample coefficient. Negative for inverted (concave-up) curves.
    pub rate: f64,
    /// Asymptote the recurrence moves toward (or away from, when inverted).
    pub target: f64,
}

impl CurveCoefficients {
    /// Returns `true` for a flat segment.
    #[inline]
    pub fn is_steady(&self) -> bool {
        self.rate == 0.0
    }

    /// Evaluate one step of the recurrence.
    #[inline]
    pub fn step(&self, level: f64) -> f64 {
        level + self.rate * (self.target - level)
    }

    /// Returns `true` while `level` is inside the segment's legal window.
    #[inline]
    pub fn contains(&self, level: f64) -> bool {
        level >= self.legal_low && level <= PEAK_LEVEL
    }
}

/// Convert a control voltage to seconds.
///
/// 0 V = 1 ms, 10 V = 10 s, one decade every 2.5 V.
///
/// # Example
/// ```rust
/// use contour_core::voltage_to_time;
///
/// assert!((voltage_to_time(0.0) - 0.001).abs() < 1e-12);
/// assert!((voltage_to_time(10.0) - 10.0).abs() < 1e-9);
/// ```
#[inline]
pub fn voltage_to_time(volts: f64) -> f64 {
    pow(10.0, volts * 0.4 - 3.0)
}

/// Nominal number of samples needed to move `delta_y` at the given rate.
///
/// The rate is clamped to [`MAX_RATE`] and the result is floored at one
/// sample, so the return value is always a safe divisor.
#[inline]
pub fn segment_samples(delta_y: f64, sample_rate: f64, rate: f64) -> f64 {
    let rate = rate.min(MAX_RATE);
    (delta_y * sample_rate * voltage_to_time(rate * VOLTS_PER_UNIT)).max(1.0)
}

/// Solve the recurrence for a curved segment.
///
/// # Arguments
/// * `level` - Level the segment starts from
/// * `sample_rate` - Sample rate in Hz (> 0)
/// * `rate` - Rate control, 1.0 = 10 V, clamped to [`MAX_RATE`]
/// * `target` - Level the segment should arrive at
/// * `curve_amount` - Curve shape in [-1, 1]; the sign selects normal
///   (concave-down) or inverted (concave-up) shaping, the magnitude how
///   sharply curved the segment is
///
/// When `target` is within [`MIN_DELTA_Y`] of `level`, the returned
/// boundary lies above the current level so the segment ends on the very
/// next sample.
///
/// # Example
/// ```rust
/// use contour_core::solve_curve;
///
/// let curve = solve_curve(0.0, 48000.0, 0.0, 1.0, 0.5);
/// assert!(curve.rate > 0.0);
/// assert!(curve.target > 1.0);
/// assert_eq!(curve.legal_low, 0.0);
/// ```
pub fn solve_curve(
    level: f64,
    sample_rate: f64,
    rate: f64,
    target: f64,
    curve_amount: f64,
) -> CurveCoefficients {
    let delta_y = fabs(target - level);
    if delta_y < MIN_DELTA_Y {
        return CurveCoefficients {
            legal_low: level + 1.0,
            rate: 0.0,
            target: 0.0,
        };
    }

    let curve_amount = curve_amount.clamp(-1.0, 1.0);

    // More time constants straighten the visible part of the curve.
    let time_constants = (TIME_CONSTANTS_PER_CURVE * fabs(curve_amount)).max(MIN_TIME_CONSTANTS);
    let delta_t = segment_samples(delta_y, sample_rate, rate);
    let step_size = time_constants / delta_t;

    let coefficient = if curve_amount > 0.0 {
        // first step of a charging curve: 1 - e^-x
        -expm1(-step_size)
    } else {
        // one step before the start: e^x - 1
        expm1(step_size)
    };

    // Fraction of the full swing reached after `time_constants`; the
    // asymptote is scaled so the curve lands on `target` at that point.
    let value_at_time1 = -expm1(-time_constants);
    let target_rel = delta_y / value_at_time1 - delta_y;
    debug_assert!(
        target_rel > 0.0,
        "curve asymptote collapsed onto target (time_constants={time_constants})"
    );
    let target_rel = if target_rel > 0.0 {
        target_rel
    } else {
        f64::EPSILON
    };

    let (legal_low, target_rel) = if target <= level {
        (target, -target_rel)
    } else {
        (0.0, target_rel)
    };

    if curve_amount >= 0.0 {
        CurveCoefficients {
            legal_low,
            rate: coefficient,
            target: target + target_rel,
        }
    } else {
        CurveCoefficients {
            legal_low,
            rate: -coefficient,
            target: level - target_rel,
        }
    }
}

/// Solve a flat segment holding `target`.
///
/// The boundary sits one full unit below the target, so the segment only
/// ends through an external event.
///
/// # Example
/// ```rust
/// use contour_core::solve_steady_state;
///
/// let flat = solve_steady_state(0.7);
/// assert!(flat.is_steady());
/// assert!(flat.contains(0.7));
/// ```
#[inline]
pub fn solve_steady_state(target: f64) -> CurveCoefficients {
    CurveCoefficients {
        legal_low: target - 1.0,
        rate: 0.0,
        target: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    /// Run the recurrence from `level` until it leaves the legal window.
    fn run_until_boundary(curve: &CurveCoefficients, mut level: f64, limit: usize) -> usize {
        for n in 1..=limit {
            level = curve.step(level);
            if !curve.contains(level) {
                return n;
            }
        }
        panic!("segment did not complete within {limit} samples");
    }

    fn level_after(curve: &CurveCoefficients, mut level: f64, samples: usize) -> f64 {
        for _ in 0..samples {
            level = curve.step(level);
        }
        level
    }

    #[test]
    fn test_voltage_to_time_calibration() {
        assert!((voltage_to_time(0.0) - 0.001).abs() < 1e-12);
        assert!((voltage_to_time(5.0) - 0.1).abs() < 1e-12);
        assert!((voltage_to_time(10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segment_completes_immediately() {
        let curve = solve_curve(0.5, SR, 0.3, 0.5 + 5e-7, 0.8);
        assert_eq!(curve.rate, 0.0);
        assert_eq!(curve.target, 0.0);
        assert_eq!(curve.legal_low, 1.5);
        assert!(!curve.contains(curve.step(0.5)));
    }

    #[test]
    fn test_rate_clamped_to_ceiling() {
        let fast = solve_curve(0.0, SR, MAX_RATE, 1.0, 0.5);
        let clamped = solve_curve(0.0, SR, 7.5, 1.0, 0.5);
        assert_eq!(fast, clamped);
    }

    #[test]
    fn test_segment_samples_floor() {
        assert_eq!(segment_samples(1e-5, SR, 0.0), 1.0);
        assert!((segment_samples(1.0, SR, 0.0) - 48.0).abs() < 1e-9);
        assert!((segment_samples(0.5, SR, 0.5) - 2400.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_sign_follows_curve_amount() {
        for &curve_amount in &[0.05, 0.5, 1.0] {
            assert!(solve_curve(0.0, SR, 0.3, 1.0, curve_amount).rate > 0.0);
            assert!(solve_curve(0.0, SR, 0.3, 1.0, -curve_amount).rate < 0.0);
        }
    }

    #[test]
    fn test_normal_attack_lands_on_schedule() {
        // 0 V full swing = 1 ms = 48 samples
        let curve = solve_curve(0.0, SR, 0.0, 1.0, 1.0);
        assert_eq!(curve.legal_low, 0.0);
        assert!(curve.target > 1.0);

        let n = run_until_boundary(&curve, 0.0, 1000);
        assert!((47..=50).contains(&n), "attack took {n} samples");
    }

    #[test]
    fn test_normal_descent_uses_target_as_boundary() {
        let curve = solve_curve(1.0, SR, 0.5, 0.4, 0.5);
        assert_eq!(curve.legal_low, 0.4);
        assert!(curve.target < 0.4, "asymptote must sit below the target");

        // 0.6 swing at 5 V = 0.6 * 0.1 s = 2880 samples
        let n = run_until_boundary(&curve, 1.0, 10_000);
        assert!((2870..=2890).contains(&n), "decay took {n} samples");
    }

    #[test]
    fn test_inverted_curve_diverges_from_start() {
        let up = solve_curve(0.0, SR, 0.3, 1.0, -0.7);
        assert!(up.target < 0.0, "inverted rise accelerates away from below");

        let down = solve_curve(0.8, SR, 0.3, 0.0, -0.7);
        assert!(down.target > 0.8, "inverted fall accelerates away from above");
        assert_eq!(down.legal_low, 0.0);

        let expected = segment_samples(0.8, SR, 0.3);
        let n = run_until_boundary(&down, 0.8, 100_000) as f64;
        assert!((n - expected).abs() <= 2.0, "{n} vs {expected}");
    }

    #[test]
    fn test_curve_concavity() {
        let samples = segment_samples(1.0, SR, 0.3) as usize;

        let normal = solve_curve(0.0, SR, 0.3, 1.0, 0.6);
        let mid = level_after(&normal, 0.0, samples / 2);
        assert!(mid > 0.6, "normal curve should rise fast first, got {mid}");

        let inverted = solve_curve(0.0, SR, 0.3, 1.0, -0.6);
        let mid = level_after(&inverted, 0.0, samples / 2);
        assert!(mid < 0.4, "inverted curve should rise slow first, got {mid}");
    }

    #[test]
    fn test_zero_curve_is_nearly_linear() {
        let curve = solve_curve(0.0, SR, 0.3, 1.0, 0.0);
        let samples = segment_samples(1.0, SR, 0.3) as usize;
        let mid = level_after(&curve, 0.0, samples / 2);
        assert!((mid - 0.5).abs() < 0.01, "got {mid}");
    }

    #[test]
    fn test_curve_amount_clamped() {
        assert_eq!(
            solve_curve(0.2, SR, 0.4, 0.9, 3.0),
            solve_curve(0.2, SR, 0.4, 0.9, 1.0)
        );
        assert_eq!(
            solve_curve(0.2, SR, 0.4, 0.9, -3.0),
            solve_curve(0.2, SR, 0.4, 0.9, -1.0)
        );
    }

    #[test]
    fn test_steady_state() {
        let flat = solve_steady_state(0.6);
        assert!(flat.is_steady());
        assert!((flat.legal_low + 0.4).abs() < 1e-12);
        assert_eq!(level_after(&flat, 0.6, 10_000), 0.6);
        assert!(flat.contains(0.6));
    }
}
