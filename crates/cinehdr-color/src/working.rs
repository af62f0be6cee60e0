//! Working-domain conversion.
//!
//! The pipeline processes every frame in BT.2020 primaries with
//! PQ-normalized encoding. [`to_working`] converts an input frame into
//! that domain; [`from_working`] converts the processed frame to the
//! requested output space and clamps it into the target gamut box.
//!
//! Linear-light spaces (P3-D65, ACEScg) carry full-scale normalized linear
//! values, 1.0 = 10000 cd/m2, so entry and exit are exact inverses of each
//! other. Rec.709 frames pass through with validation only; the engine has
//! no Rec.709 matrix in its frozen set.
//!
//! Non-finite pixels become black at both boundaries - this is the
//! pipeline's first and last line of NaN defense.

use crate::matrices;
use cinehdr_core::{ColorSpaceTag, Frame};
use cinehdr_math::{is_finite_rgb, saturate};
use cinehdr_transfer::pq;

/// Converts a frame into the working domain (BT.2020 + PQ normalized).
///
/// Non-finite pixels are replaced with black; all outputs are saturated to
/// [0, 1].
pub fn to_working(input: &Frame) -> Frame {
    let mut output = Frame::new(input.width(), input.height(), ColorSpaceTag::Bt2020Pq);

    for (src, dst) in input.pixels().zip(output.pixels_mut()) {
        let rgb = [src[0], src[1], src[2]];
        if !is_finite_rgb(&rgb) {
            dst.fill(0.0);
            continue;
        }

        let working = match input.color_space {
            ColorSpaceTag::Bt2020Pq => rgb,
            ColorSpaceTag::P3D65 => {
                let bt2020 = matrices::P3D65_TO_BT2020.transform(rgb);
                pq::oetf_normalized_rgb(bt2020)
            }
            ColorSpaceTag::AcesCg => {
                let bt2020 = matrices::ACESCG_TO_BT2020.transform(rgb);
                pq::oetf_normalized_rgb(bt2020)
            }
            // No Rec.709 matrix in the frozen set: validated pass-through.
            ColorSpaceTag::Rec709 => rgb,
        };

        if is_finite_rgb(&working) {
            dst[0] = saturate(working[0]);
            dst[1] = saturate(working[1]);
            dst[2] = saturate(working[2]);
        } else {
            dst.fill(0.0);
        }
    }

    output
}

/// Converts a working-domain frame to `target` and clamps into its gamut
/// box.
pub fn from_working(input: &Frame, target: ColorSpaceTag) -> Frame {
    let mut output = Frame::new(input.width(), input.height(), target);

    for (src, dst) in input.pixels().zip(output.pixels_mut()) {
        let rgb = [src[0], src[1], src[2]];
        if !is_finite_rgb(&rgb) {
            dst.fill(0.0);
            continue;
        }

        let mut out = match target {
            ColorSpaceTag::Bt2020Pq => rgb,
            ColorSpaceTag::P3D65 => {
                let bt2020 = pq::eotf_normalized_rgb(rgb);
                matrices::BT2020_TO_P3D65.transform(bt2020)
            }
            ColorSpaceTag::AcesCg => {
                let bt2020 = pq::eotf_normalized_rgb(rgb);
                matrices::BT2020_TO_ACESCG.transform(bt2020)
            }
            ColorSpaceTag::Rec709 => rgb,
        };

        if is_finite_rgb(&out) {
            target.clamp(&mut out);
            dst.copy_from_slice(&out);
        } else {
            dst.fill(0.0);
        }
    }

    output
}
