//! Numerical curve validators.
//!
//! The engine runs both validators once per (re)initialization, on the
//! first processed frame:
//!
//! - **Monotonicity**: samples 4096 uniform points plus 256 points focused
//!   around the curve's critical point (the PPR pivot or the RLOG splice
//!   threshold) and requires every consecutive pair to be non-decreasing.
//! - **C1 continuity**: estimates left/right derivatives at a coarse
//!   interior grid using one-sided differences with step [`C1_EPSILON`] and
//!   records the largest gap. The pass threshold is calibrated for f32
//!   arithmetic: smooth-curve curvature alone contributes on the order of
//!   `epsilon * |f''|` to each gap, so the threshold sits well above that
//!   floor while still catching genuine derivative jumps, which show up at
//!   full magnitude independent of the step size.

use crate::curve::ToneCurve;
use cinehdr_core::CurveKind;
use tracing::debug;

/// Uniform sample count for the monotonicity sweep.
pub const MONOTONIC_SAMPLES: usize = 4096;

/// Focused sample count around the critical point.
pub const FOCUS_SAMPLES: usize = 256;

/// Derivative estimation step.
pub const C1_EPSILON: f32 = 1e-3;

/// Default maximum admissible derivative gap under f32 arithmetic.
pub const C1_GAP_THRESHOLD: f32 = 5e-2;

/// Interior grid size for the C1 sweep.
const C1_GRID: usize = 50;

/// Outcome of the curve self-check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveCheck {
    /// True when the monotonicity sweep found no decrease.
    pub monotonic: bool,
    /// True when the largest derivative gap stayed under the threshold.
    pub c1_continuous: bool,
    /// Largest derivative gap observed.
    pub max_derivative_gap: f32,
}

impl CurveCheck {
    /// True when both properties hold.
    pub fn passed(&self) -> bool {
        self.monotonic && self.c1_continuous
    }
}

/// Runs both validators with the default thresholds.
pub fn check_curve(curve: &ToneCurve) -> CurveCheck {
    let monotonic = check_monotonic(curve);
    let (c1_continuous, max_derivative_gap) = check_c1(curve, C1_EPSILON, C1_GAP_THRESHOLD);
    debug!(
        monotonic,
        c1_continuous, max_derivative_gap, "curve self-check"
    );
    CurveCheck {
        monotonic,
        c1_continuous,
        max_derivative_gap,
    }
}

/// Builds the monotonicity sample grid: uniform plus focused points.
fn sample_points(curve: &ToneCurve) -> Vec<f32> {
    let mut points = Vec::with_capacity(MONOTONIC_SAMPLES + FOCUS_SAMPLES);

    for i in 0..MONOTONIC_SAMPLES {
        points.push(i as f32 / (MONOTONIC_SAMPLES - 1) as f32);
    }

    // Focused cluster: +-5% of the pivot for PPR, +-10% of the splice for
    // RLOG.
    let center = curve.critical_point();
    let half_span = match curve.kind() {
        CurveKind::Ppr => 0.05,
        CurveKind::Rlog => 0.10,
    };
    for i in 0..FOCUS_SAMPLES {
        let offset = (i as f32 / FOCUS_SAMPLES as f32 - 0.5) * 2.0 * half_span;
        points.push((center + offset).clamp(0.0, 1.0));
    }

    points.sort_by(|a, b| a.partial_cmp(b).expect("finite sample points"));
    points
}

/// Monotonicity sweep: zero tolerance for decreases.
pub fn check_monotonic(curve: &ToneCurve) -> bool {
    let points = sample_points(curve);
    let mut prev = f32::NEG_INFINITY;
    for &x in &points {
        let y = curve.apply(x);
        if y < prev {
            debug!(x, y, prev, "monotonicity violation");
            return false;
        }
        prev = y;
    }
    true
}

/// C1 sweep: returns `(passed, max_gap)`.
///
/// Left and right derivatives are one-sided differences over `epsilon` at
/// each interior grid point; boundary points within `epsilon` of 0 or 1
/// are skipped.
pub fn check_c1(curve: &ToneCurve, epsilon: f32, threshold: f32) -> (bool, f32) {
    let mut max_gap = 0.0f32;

    for i in 1..C1_GRID - 1 {
        let x = i as f32 / (C1_GRID - 1) as f32;
        if x <= epsilon || x >= 1.0 - epsilon {
            continue;
        }

        let left = (curve.apply(x) - curve.apply(x - epsilon)) / epsilon;
        let right = (curve.apply(x + epsilon) - curve.apply(x)) / epsilon;
        let gap = (right - left).abs();
        if gap > max_gap {
            max_gap = gap;
        }
    }

    (max_gap <= threshold, max_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinehdr_core::Params;

    #[test]
    fn test_default_bundle_passes() {
        let curve = ToneCurve::new(&Params::default());
        let check = check_curve(&curve);
        assert!(check.monotonic);
        assert!(check.c1_continuous, "gap {}", check.max_derivative_gap);
        assert!(check.passed());
    }

    #[test]
    fn test_all_presets_pass() {
        for params in Params::presets() {
            let curve = ToneCurve::new(&params);
            let check = check_curve(&curve);
            assert!(check.passed(), "preset failed: {params:?} -> {check:?}");
        }
    }

    #[test]
    fn test_rlog_passes() {
        let params = Params {
            curve: CurveKind::Rlog,
            ..Params::default()
        };
        let curve = ToneCurve::new(&params);
        let check = check_curve(&curve);
        assert!(check.passed(), "{check:?}");
    }

    #[test]
    fn test_extreme_admissible_bundles_monotonic() {
        let corners = [
            Params {
                pivot_pq: 0.05,
                gamma_s: 1.6,
                gamma_h: 0.8,
                shoulder_h: 3.0,
                ..Params::default()
            },
            Params {
                pivot_pq: 0.30,
                gamma_s: 1.0,
                gamma_h: 1.4,
                shoulder_h: 0.5,
                ..Params::default()
            },
            Params {
                curve: CurveKind::Rlog,
                rlog_a: 16.0,
                rlog_b: 1.2,
                rlog_c: 0.5,
                rlog_t: 0.7,
                ..Params::default()
            },
            Params {
                curve: CurveKind::Rlog,
                rlog_a: 1.0,
                rlog_b: 0.8,
                rlog_c: 3.0,
                rlog_t: 0.4,
                ..Params::default()
            },
        ];
        for params in corners {
            let curve = ToneCurve::new(&params);
            assert!(check_monotonic(&curve), "not monotonic: {params:?}");
        }
    }

    #[test]
    fn test_gap_is_recorded() {
        let curve = ToneCurve::new(&Params::default());
        let (_, gap) = check_c1(&curve, C1_EPSILON, C1_GAP_THRESHOLD);
        assert!(gap.is_finite());
        assert!(gap >= 0.0);
    }

    #[test]
    fn test_focused_samples_cover_critical_point() {
        let curve = ToneCurve::new(&Params::default());
        let points = sample_points(&curve);
        let center = curve.critical_point();
        let near = points
            .iter()
            .filter(|&&x| (x - center).abs() <= 0.05)
            .count();
        // The focused cluster plus uniform coverage lands well over 256
        // samples in the +-5% band.
        assert!(near >= 256, "only {near} samples near the pivot");
    }
}
