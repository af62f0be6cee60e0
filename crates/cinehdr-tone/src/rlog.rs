//! RLOG: the Rational Logarithmic tone curve.
//!
//! Two segments spliced at a threshold `t`:
//!
//! - Dark: `y_d(x) = log(1 + a*x) / log(1 + a)`
//! - Highlight: `y_h(x) = s * b*x / (1 + c*x)` where the continuity scale
//!   `s = y_d(t) / y_h_raw(t)` forces the branches to agree at the splice.
//! - Blend: smoothstep over a fixed half-width of 0.05 centered at `t`.
//!
//! The continuity scale makes the splice value-continuous by construction;
//! the smoothstep window supplies the C1 blend.

use cinehdr_math::{mix, safe_div, safe_log, smoothstep};

/// Splice blend half-width.
pub const BLEND_HALF_WIDTH: f32 = 0.05;

/// Dark segment: normalized logarithm.
#[inline]
pub fn dark_segment(x: f32, a: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let num = safe_log(1.0 + a * x, 0.0);
    let den = safe_log(1.0 + a, 0.0);
    safe_div(num, den, x)
}

/// Raw highlight segment before continuity scaling.
#[inline]
pub fn highlight_segment_raw(x: f32, b: f32, c: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let x = x.min(1.0);
    safe_div(b * x, 1.0 + c * x, x)
}

/// Continuity scale forcing the branches to agree at the splice.
#[inline]
pub fn continuity_scale(a: f32, b: f32, c: f32, t: f32) -> f32 {
    let dark_at_t = dark_segment(t, a);
    let raw_at_t = highlight_segment_raw(t, b, c);
    safe_div(dark_at_t, raw_at_t, 1.0)
}

/// Evaluates the RLOG curve at `x` (expected in [0, 1]).
///
/// # Example
///
/// ```rust
/// use cinehdr_tone::rlog;
///
/// // The splice is continuous: both branches agree at t.
/// let t = 0.55;
/// let below = rlog::eval(t - 1e-4, 8.0, 1.0, 1.5, t);
/// let above = rlog::eval(t + 1e-4, 8.0, 1.0, 1.5, t);
/// assert!((below - above).abs() < 1e-3);
/// ```
#[inline]
pub fn eval(x: f32, a: f32, b: f32, c: f32, t: f32) -> f32 {
    let scale = continuity_scale(a, b, c, t);

    let lo = t - BLEND_HALF_WIDTH;
    let hi = t + BLEND_HALF_WIDTH;

    if x <= lo {
        return dark_segment(x, a);
    }
    if x >= hi {
        return scale * highlight_segment_raw(x, b, c);
    }

    let dark = dark_segment(x, a);
    let highlight = scale * highlight_segment_raw(x, b, c);
    let weight = smoothstep(lo, hi, x);
    mix(dark, highlight, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: f32 = 8.0;
    const B: f32 = 1.0;
    const C: f32 = 1.5;
    const T: f32 = 0.55;

    fn default_eval(x: f32) -> f32 {
        eval(x, A, B, C, T)
    }

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(default_eval(0.0), 0.0);
    }

    #[test]
    fn test_dark_segment_shape() {
        // The normalized log lifts shadows above linear.
        let y = dark_segment(0.1, A);
        assert!(y > 0.1);
        assert!((dark_segment(1.0, A) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_splice_continuity() {
        let scale = continuity_scale(A, B, C, T);
        let dark = dark_segment(T, A);
        let scaled = scale * highlight_segment_raw(T, B, C);
        assert!((dark - scaled).abs() < 1e-5);
    }

    #[test]
    fn test_left_right_limits_agree() {
        let below = default_eval(T - 1e-4);
        let above = default_eval(T + 1e-4);
        assert!((below - above).abs() < 1e-3);
    }

    #[test]
    fn test_derivative_continuity_at_splice() {
        // Numerical derivatives on each side of the splice agree within
        // the f32 budget.
        let eps = 1e-3;
        let left = (default_eval(T) - default_eval(T - eps)) / eps;
        let right = (default_eval(T + eps) - default_eval(T)) / eps;
        assert!((left - right).abs() < 1e-2, "left={left}, right={right}");
    }

    #[test]
    fn test_monotonic_dense_grid() {
        let mut prev = -1.0f32;
        for i in 0..=4096 {
            let x = i as f32 / 4096.0;
            let y = default_eval(x);
            assert!(y >= prev, "decrease at x={x}");
            prev = y;
        }
    }

    #[test]
    fn test_monotonic_extreme_params() {
        for &(a, b, c) in &[(1.0, 0.8, 3.0), (16.0, 1.2, 0.5), (16.0, 0.8, 3.0)] {
            for &t in &[0.4, 0.55, 0.7] {
                let mut prev = -1.0f32;
                for i in 0..=4096 {
                    let x = i as f32 / 4096.0;
                    let y = eval(x, a, b, c, t);
                    assert!(y >= prev, "decrease at x={x} (a={a}, b={b}, c={c}, t={t})");
                    prev = y;
                }
            }
        }
    }

    #[test]
    fn test_degenerate_scale_falls_back() {
        // A raw highlight value of zero at the splice cannot happen with
        // admissible parameters, but the scale must stay finite anyway.
        let scale = continuity_scale(8.0, 0.0, 1.5, 0.55);
        assert_eq!(scale, 1.0);
    }
}
