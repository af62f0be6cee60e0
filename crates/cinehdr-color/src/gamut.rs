//! The two-stage gamut processor.
//!
//! Invoked on every pixel when leaving the working domain:
//!
//! 1. **Linear compression** scales the whole pixel down by its MaxRGB
//!    when it exceeds the gamut ceiling, preserving hue along the
//!    achromatic axis, then clamps negatives to the gamut floor. ACEScg
//!    uses the permissive [-0.5, 2.0] box and only rescales above 2.0.
//! 2. **Perceptual clamp** runs when DCI compliance is on or stage 1 left
//!    the pixel outside the box: up to [`MAX_CLAMP_ITERATIONS`] rounds of
//!    OKLab chroma reduction (x0.9 per round, `L` fixed), accepting the
//!    first in-gamut iterate. A pixel that never converges is
//!    coordinate-clamped and reported as `GAMUT_OOG`.
//!
//! The processor returns whether the pixel was out of gamut on entry, so
//! the pipeline can aggregate per-frame statistics.

use crate::oklab::{oklab_to_rgb, rgb_to_oklab};
use cinehdr_core::{ColorSpaceTag, ErrorCode, ErrorHandler};
use cinehdr_math::is_finite_rgb;

/// Iteration budget of the perceptual clamp.
pub const MAX_CLAMP_ITERATIONS: usize = 10;

/// Per-iteration chroma reduction factor.
pub const CHROMA_REDUCTION: f32 = 0.9;

/// Containment slack absorbing OKLab round-trip noise.
///
/// An achromatic pixel sitting exactly on the gamut ceiling can round-trip
/// a hair outside the box with no chroma left to reduce; candidates within
/// this slack are accepted and snapped onto the boundary.
const CONTAINMENT_SLACK: f32 = 1e-4;

/// Stage 1: hue-preserving linear compression into the gamut box.
pub fn linear_compression(rgb: &mut [f32; 3], target: ColorSpaceTag) {
    if !is_finite_rgb(rgb) {
        return;
    }

    let (floor, ceiling) = target.gamut_bounds();
    let max_val = rgb[0].max(rgb[1]).max(rgb[2]);
    if max_val > ceiling {
        let scale = ceiling / max_val;
        rgb[0] *= scale;
        rgb[1] *= scale;
        rgb[2] *= scale;
    }
    for c in rgb.iter_mut() {
        *c = c.max(floor);
    }
}

/// Stage 2: iterative perceptual clamp in OKLab.
///
/// Returns `true` when an in-gamut iterate was found within the budget;
/// `false` means the result was coordinate-clamped.
pub fn perceptual_clamp(rgb: &mut [f32; 3], target: ColorSpaceTag) -> bool {
    if !is_finite_rgb(rgb) {
        return false;
    }

    let (floor, ceiling) = target.gamut_bounds();
    let mut lab = rgb_to_oklab(*rgb);

    for _ in 0..MAX_CLAMP_ITERATIONS {
        let mut candidate = oklab_to_rgb(lab);
        let in_box = candidate
            .iter()
            .all(|&c| c >= floor - CONTAINMENT_SLACK && c <= ceiling + CONTAINMENT_SLACK);
        if in_box {
            target.clamp(&mut candidate);
            *rgb = candidate;
            return true;
        }
        lab[1] *= CHROMA_REDUCTION;
        lab[2] *= CHROMA_REDUCTION;
    }

    let mut last = oklab_to_rgb(lab);
    target.clamp(&mut last);
    *rgb = last;
    false
}

/// The full two-stage gamut processor.
///
/// Returns `true` when the pixel was out of gamut before processing.
/// Non-convergence of the perceptual clamp is reported through `handler`
/// as `GAMUT_OOG`; processing still completes with a coordinate clamp.
///
/// # Example
///
/// ```rust
/// use cinehdr_color::apply_gamut_processing;
/// use cinehdr_core::{ColorSpaceTag, ErrorHandler};
///
/// let handler = ErrorHandler::new();
/// let mut px = [1.5, 0.9, -0.1];
/// let was_oog = apply_gamut_processing(&mut px, ColorSpaceTag::P3D65, true, &handler);
/// assert!(was_oog);
/// assert!(px.iter().all(|&c| (0.0..=1.0).contains(&c)));
/// ```
pub fn apply_gamut_processing(
    rgb: &mut [f32; 3],
    target: ColorSpaceTag,
    dci_compliance: bool,
    handler: &ErrorHandler,
) -> bool {
    if !is_finite_rgb(rgb) {
        *rgb = [0.0, 0.0, 0.0];
        return false;
    }

    let was_out_of_gamut = !target.contains(rgb);

    linear_compression(rgb, target);

    if dci_compliance || !target.contains(rgb) {
        if !perceptual_clamp(rgb, target) {
            handler.report(
                ErrorCode::GamutOog,
                "perceptual gamut clamp did not converge",
                None,
            );
        }
    }

    if !is_finite_rgb(rgb) {
        *rgb = [0.0, 0.0, 0.0];
        return false;
    }
    target.clamp(rgb);

    was_out_of_gamut
}
