//! Perceptual saturation shaping in OKLab.
//!
//! Two stages, both touching only the chroma channels (`a`, `b`); `L` is
//! never modified:
//!
//! 1. **Base saturation**: global chroma scale by `sat_base`.
//! 2. **Highlight saturation**: chroma scaled toward `sat_hi`, weighted by
//!    `w = smoothstep(pivot, 1, lum)` where `lum` is the working-domain
//!    MaxRGB of the pixel *before* the OKLab conversion.
//!
//! In DCI compliance mode `sat_hi` is trimmed by 7.5% (x0.925) before the
//! highlight step, biasing highlight chroma toward the projector-safe
//! range.

use crate::oklab::{oklab_to_rgb, rgb_to_oklab};
use cinehdr_math::{is_finite, is_finite_rgb, mix, saturate, smoothstep};

/// Conservative `sat_hi` trim factor in DCI compliance mode.
pub const DCI_SAT_TRIM: f32 = 0.925;

/// Scales OKLab chroma uniformly; `L` is untouched.
#[inline]
pub fn apply_base_saturation(lab: &mut [f32; 3], saturation: f32) {
    if !is_finite_rgb(lab) || !is_finite(saturation) {
        return;
    }
    let saturation = saturation.clamp(0.0, 2.0);
    lab[1] *= saturation;
    lab[2] *= saturation;
}

/// Blends chroma toward `saturation * chroma` by `weight`; `L` is
/// untouched.
#[inline]
pub fn apply_highlight_saturation(lab: &mut [f32; 3], saturation: f32, weight: f32) {
    if !is_finite_rgb(lab) || !is_finite(saturation) || !is_finite(weight) {
        return;
    }
    let saturation = saturation.clamp(0.0, 2.0);
    let weight = saturate(weight);

    let target_a = lab[1] * saturation;
    let target_b = lab[2] * saturation;
    lab[1] = mix(lab[1], target_a, weight);
    lab[2] = mix(lab[2], target_b, weight);
}

/// The full saturation stage for one working-domain pixel.
///
/// `lum` is the pixel's MaxRGB before conversion; it drives the highlight
/// weight. Returns the reshaped pixel in linear RGB; non-finite results
/// collapse to black.
///
/// # Example
///
/// ```rust
/// use cinehdr_color::apply_saturation;
///
/// // sat_base = 0 fully desaturates: all channels converge.
/// let gray = apply_saturation([0.6, 0.3, 0.1], 0.0, 1.0, 0.18, 0.6, false);
/// assert!((gray[0] - gray[1]).abs() < 1e-2);
/// assert!((gray[1] - gray[2]).abs() < 1e-2);
/// ```
pub fn apply_saturation(
    rgb: [f32; 3],
    sat_base: f32,
    sat_hi: f32,
    pivot: f32,
    lum: f32,
    dci_compliance: bool,
) -> [f32; 3] {
    if !is_finite_rgb(&rgb) {
        return [0.0, 0.0, 0.0];
    }

    let lum = saturate(lum);
    let sat_hi = if dci_compliance {
        sat_hi * DCI_SAT_TRIM
    } else {
        sat_hi
    };

    let mut lab = rgb_to_oklab(rgb);

    apply_base_saturation(&mut lab, sat_base);

    let weight = smoothstep(pivot, 1.0, lum);
    apply_highlight_saturation(&mut lab, sat_hi, weight);

    let out = oklab_to_rgb(lab);
    if is_finite_rgb(&out) {
        out
    } else {
        [0.0, 0.0, 0.0]
    }
}
