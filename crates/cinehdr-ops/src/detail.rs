//! Pivot-masked highlight detail (USM) with motion protection.
//!
//! The detail pass sharpens only the highlight region of a working-domain
//! frame:
//!
//! 1. **Mask**: per pixel, `mask = (MaxRGB - pivot) / (1 - pivot)` clamped
//!    to [0, 1]; zero at or below the pivot.
//! 2. **Blur**: the fixed separable Gaussian from [`crate::blur`].
//! 3. **Unsharp layer**: `d = original - blurred`, kept only where
//!    `|d| > 0.03` and scaled by the effective intensity.
//! 4. **Compose**: `out = saturate(original + d * mask)`.
//!
//! With intensity 0 the pass is a pixel-wise identity, and pixels at or
//! below the pivot are never modified.
//!
//! # Motion protection
//!
//! When a previous frame is available, the processor measures RMS
//! luminance change over the highlight region and keeps a ring of the ten
//! most recent values. Detail strength is halved while the current energy
//! exceeds 0.02 or the ring mean exceeds 0.01 (PQ-normalized units), which
//! keeps the USM from amplifying temporal noise into visible flicker.

use crate::blur::gaussian_blur;
use crate::{OpsError, OpsResult};
use cinehdr_core::Frame;
use cinehdr_math::saturate;
use rayon::prelude::*;
use std::collections::VecDeque;
use tracing::debug;

/// Unsharp difference threshold; smaller differences are treated as noise.
pub const USM_THRESHOLD: f32 = 0.03;

/// Current-frame motion energy above which detail is suppressed.
pub const MOTION_THRESHOLD: f32 = 0.02;

/// History-mean motion energy above which detail is suppressed.
pub const MOTION_HISTORY_THRESHOLD: f32 = 0.01;

/// Length of the motion energy ring.
pub const MOTION_HISTORY_LEN: usize = 10;

/// Intensity multiplier applied while motion protection is active.
pub const SUPPRESSION_FACTOR: f32 = 0.5;

/// Stateful highlight-detail processor.
///
/// Owns the motion history and a copy of the previous frame; everything
/// else is recomputed per call.
#[derive(Debug)]
pub struct HighlightDetail {
    intensity: f32,
    deterministic: bool,
    previous: Option<Frame>,
    motion_history: VecDeque<f32>,
}

impl HighlightDetail {
    /// Creates a processor with the given USM intensity.
    pub fn new(intensity: f32, deterministic: bool) -> Self {
        Self {
            intensity,
            deterministic,
            previous: None,
            motion_history: VecDeque::with_capacity(MOTION_HISTORY_LEN),
        }
    }

    /// Updates the deterministic flag (affects reduction order only).
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic = deterministic;
    }

    /// Drops the previous frame and the motion history.
    pub fn reset(&mut self) {
        self.previous = None;
        self.motion_history.clear();
    }

    /// Effective intensity used for the most recent frame.
    ///
    /// Halved relative to the configured intensity while motion
    /// protection is active.
    pub fn last_effective_intensity(&self) -> f32 {
        if self.suppression_active() {
            self.intensity * SUPPRESSION_FACTOR
        } else {
            self.intensity
        }
    }

    fn suppression_active(&self) -> bool {
        if let Some(&current) = self.motion_history.back() {
            if current > MOTION_THRESHOLD {
                return true;
            }
        }
        if !self.motion_history.is_empty() {
            let mean: f32 =
                self.motion_history.iter().sum::<f32>() / self.motion_history.len() as f32;
            if mean > MOTION_HISTORY_THRESHOLD {
                return true;
            }
        }
        false
    }

    /// Processes one frame, applying motion protection against the
    /// previously processed frame.
    ///
    /// `pivot` is the highlight-mask onset in the PQ-normalized domain.
    pub fn process(&mut self, input: &Frame, pivot: f32) -> OpsResult<Frame> {
        if !input.is_valid() {
            return Err(OpsError::InvalidDimensions(format!(
                "invalid input frame {}x{}",
                input.width(),
                input.height()
            )));
        }

        if let Some(prev) = &self.previous {
            if prev.same_size(input) {
                let energy = motion_energy(input, prev, pivot, self.deterministic);
                if self.motion_history.len() >= MOTION_HISTORY_LEN {
                    self.motion_history.pop_front();
                }
                self.motion_history.push_back(energy);
            } else {
                // A size change breaks temporal continuity.
                self.motion_history.clear();
            }
        }

        let result = if self.intensity <= 0.0 {
            input.clone()
        } else {
            let effective = self.last_effective_intensity();
            if effective < self.intensity {
                debug!(effective, "motion protection engaged");
            }
            apply_usm(input, pivot, effective, !self.deterministic)?
        };

        self.previous = Some(input.clone());
        Ok(result)
    }
}

/// Single-channel highlight mask from MaxRGB.
pub fn highlight_mask(frame: &Frame, pivot: f32) -> Vec<f32> {
    let span = 1.0 - pivot;
    frame
        .pixels()
        .map(|px| {
            let lum = px[0].max(px[1]).max(px[2]);
            if lum <= pivot || span <= 0.0 {
                0.0
            } else {
                saturate((lum - pivot) / span)
            }
        })
        .collect()
}

/// One pass of pivot-masked unsharp masking.
///
/// `parallel` selects the blur's row-sharded path; both paths are
/// bit-identical, so this only controls execution order.
pub fn apply_usm(input: &Frame, pivot: f32, amount: f32, parallel: bool) -> OpsResult<Frame> {
    let width = input.width();
    let height = input.height();
    let channels = input.channels();

    let mask = highlight_mask(input, pivot);
    let blurred = gaussian_blur(input.data(), width, height, channels, parallel)?;

    let mut output = input.clone();
    let src = input.data();
    for (i, out_px) in output.data_mut().chunks_exact_mut(channels).enumerate() {
        let m = mask[i];
        for (c, out_c) in out_px.iter_mut().enumerate() {
            let idx = i * channels + c;
            let diff = src[idx] - blurred[idx];
            let detail = if diff.abs() > USM_THRESHOLD {
                diff * amount
            } else {
                0.0
            };
            *out_c = saturate(src[idx] + detail * m);
        }
    }
    Ok(output)
}

/// RMS luminance change over the highlight region, clamped to [0, 1].
///
/// Only pixels whose current MaxRGB exceeds `pivot` contribute. The
/// deterministic path reduces in row-major order; the parallel path uses
/// rayon's tree reduction.
pub fn motion_energy(current: &Frame, previous: &Frame, pivot: f32, deterministic: bool) -> f32 {
    if !current.same_size(previous) {
        return 0.0;
    }

    let accumulate = |(sum, count): (f64, u64), (cur, prev): (&[f32], &[f32])| {
        let cur_lum = cur[0].max(cur[1]).max(cur[2]);
        if cur_lum > pivot {
            let prev_lum = prev[0].max(prev[1]).max(prev[2]);
            let diff = (cur_lum - prev_lum) as f64;
            (sum + diff * diff, count + 1)
        } else {
            (sum, count)
        }
    };

    let (sum, count) = if deterministic {
        current
            .pixels()
            .zip(previous.pixels())
            .fold((0.0f64, 0u64), accumulate)
    } else {
        current
            .data()
            .par_chunks_exact(3)
            .zip(previous.data().par_chunks_exact(3))
            .fold(
                || (0.0f64, 0u64),
                |acc, pair| accumulate(acc, pair),
            )
            .reduce(|| (0.0f64, 0u64), |a, b| (a.0 + b.0, a.1 + b.1))
    };

    if count == 0 {
        return 0.0;
    }
    saturate(((sum / count as f64).sqrt()) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinehdr_core::ColorSpaceTag;

    /// 32x32 frame: left half at `left`, right half at `right`.
    fn split_frame(left: f32, right: f32) -> Frame {
        let mut frame = Frame::new(32, 32, ColorSpaceTag::Bt2020Pq);
        for y in 0..32 {
            for x in 0..32 {
                let v = if x < 16 { left } else { right };
                frame.pixel_mut(x, y).fill(v);
            }
        }
        frame
    }

    #[test]
    fn test_zero_intensity_is_identity() {
        let frame = split_frame(0.1, 0.8);
        let mut detail = HighlightDetail::new(0.0, false);
        let out = detail.process(&frame, 0.18).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_below_pivot_strictly_unchanged() {
        let frame = split_frame(0.1, 0.25);
        let mut detail = HighlightDetail::new(0.4, false);
        let out = detail.process(&frame, 0.18).unwrap();

        for y in 0..32 {
            for x in 0..16 {
                // The whole left half sits below the pivot, so the mask is
                // zero even where the blur window crosses the boundary.
                let a = frame.pixel_rgb(x, y);
                let b = out.pixel_rgb(x, y);
                for c in 0..3 {
                    assert!((a[c] - b[c]).abs() < 1e-4, "changed at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_highlight_side_perturbed_in_range() {
        let frame = split_frame(0.1, 0.25);
        let mut detail = HighlightDetail::new(0.4, false);
        let out = detail.process(&frame, 0.18).unwrap();

        let mut perturbed = false;
        for y in 0..32 {
            for x in 16..32 {
                let a = frame.pixel_rgb(x, y);
                let b = out.pixel_rgb(x, y);
                for c in 0..3 {
                    assert!((0.0..=1.0).contains(&b[c]));
                    if (a[c] - b[c]).abs() > 1e-6 {
                        perturbed = true;
                    }
                }
            }
        }
        assert!(perturbed, "no detail perturbation in the highlight half");
    }

    #[test]
    fn test_mask_gates_on_pivot() {
        let frame = split_frame(0.1, 0.5);
        let mask = highlight_mask(&frame, 0.18);
        // Left half: below the pivot.
        assert_eq!(mask[0], 0.0);
        // Right half: (0.5 - 0.18) / 0.82.
        let expected = (0.5 - 0.18) / 0.82;
        assert!((mask[31] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_motion_energy_detects_shift() {
        let first = split_frame(0.1, 0.25);
        let second = split_frame(0.1, 0.30);
        let energy = motion_energy(&second, &first, 0.18, false);
        // Right half moved by 0.05; only highlight pixels count.
        assert!((energy - 0.05).abs() < 1e-3, "energy {energy}");
        assert!(energy > MOTION_THRESHOLD);
    }

    #[test]
    fn test_motion_energy_deterministic_path_agrees() {
        let first = split_frame(0.1, 0.25);
        let second = split_frame(0.12, 0.31);
        let par = motion_energy(&second, &first, 0.18, false);
        let seq = motion_energy(&second, &first, 0.18, true);
        assert!((par - seq).abs() < 1e-7);
    }

    #[test]
    fn test_motion_suppression_halves_intensity() {
        let first = split_frame(0.1, 0.25);
        let second = split_frame(0.1, 0.30);

        let mut detail = HighlightDetail::new(0.4, false);
        detail.process(&first, 0.18).unwrap();
        assert!((detail.last_effective_intensity() - 0.4).abs() < 1e-6);

        detail.process(&second, 0.18).unwrap();
        assert!(
            (detail.last_effective_intensity() - 0.2).abs() < 1e-6,
            "suppression did not halve intensity"
        );
    }

    #[test]
    fn test_static_sequence_not_suppressed() {
        let frame = split_frame(0.1, 0.25);
        let mut detail = HighlightDetail::new(0.4, false);
        for _ in 0..5 {
            detail.process(&frame, 0.18).unwrap();
        }
        assert!((detail.last_effective_intensity() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_history_ring_bounded() {
        let a = split_frame(0.1, 0.25);
        let b = split_frame(0.1, 0.26);
        let mut detail = HighlightDetail::new(0.2, false);
        for i in 0..25 {
            let frame = if i % 2 == 0 { &a } else { &b };
            detail.process(frame, 0.18).unwrap();
        }
        assert!(detail.motion_history.len() <= MOTION_HISTORY_LEN);
    }

    #[test]
    fn test_reset_clears_state() {
        let frame = split_frame(0.1, 0.3);
        let mut detail = HighlightDetail::new(0.2, false);
        detail.process(&frame, 0.18).unwrap();
        detail.reset();
        assert!(detail.previous.is_none());
        assert!(detail.motion_history.is_empty());
    }
}
