//! Separable Gaussian blur.
//!
//! The highlight-detail USM is contractually tied to one specific blur:
//! radius 2 px, sigma 1.0, kernel normalized to unit sum, edges extended
//! by clamping source indices. A larger kernel would change the USM
//! character, so the constants are fixed here rather than parameterized.
//!
//! Rows are sharded across rayon workers by default. Each output sample
//! depends only on read-only input, so the parallel and sequential paths
//! produce bit-identical results; the sequential path exists for the
//! deterministic mode's fixed-order execution contract.

use crate::{OpsError, OpsResult};
use rayon::prelude::*;

/// Fixed blur radius in pixels.
pub const BLUR_RADIUS: usize = 2;

/// Fixed Gaussian sigma.
pub const BLUR_SIGMA: f32 = 1.0;

/// Builds the normalized 1-D Gaussian kernel of `2 * radius + 1` taps.
pub fn gaussian_kernel(radius: usize, sigma: f32) -> Vec<f32> {
    let size = 2 * radius + 1;
    let mut kernel = Vec::with_capacity(size);
    let denom = 2.0 * sigma * sigma;

    let mut sum = 0.0f32;
    for i in 0..size {
        let x = i as f32 - radius as f32;
        let w = (-(x * x) / denom).exp();
        kernel.push(w);
        sum += w;
    }
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Separable Gaussian blur over interleaved channel data.
///
/// `src` is row-major with `channels` interleaved samples per pixel.
/// Edges clamp to the nearest valid source index.
pub fn gaussian_blur(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    parallel: bool,
) -> OpsResult<Vec<f32>> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(
            "width, height, and channels must be > 0".into(),
        ));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| OpsError::InvalidDimensions("image dimensions overflow".into()))?;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }

    let kernel = gaussian_kernel(BLUR_RADIUS, BLUR_SIGMA);
    let temp = blur_horizontal(src, width, height, channels, &kernel, parallel);
    Ok(blur_vertical(&temp, width, height, channels, &kernel, parallel))
}

fn blur_row(
    src: &[f32],
    row: &mut [f32],
    y: usize,
    width: usize,
    channels: usize,
    kernel: &[f32],
) {
    for x in 0..width {
        for c in 0..channels {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - BLUR_RADIUS as isize)
                    .clamp(0, width as isize - 1) as usize;
                sum += src[(y * width + sx) * channels + c] * w;
            }
            row[x * channels + c] = sum;
        }
    }
}

fn blur_horizontal(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    parallel: bool,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; src.len()];
    let row_len = width * channels;

    if parallel {
        dst.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| blur_row(src, row, y, width, channels, kernel));
    } else {
        for (y, row) in dst.chunks_mut(row_len).enumerate() {
            blur_row(src, row, y, width, channels, kernel);
        }
    }
    dst
}

fn blur_column_pass_row(
    src: &[f32],
    row: &mut [f32],
    y: usize,
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) {
    for x in 0..width {
        for c in 0..channels {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - BLUR_RADIUS as isize)
                    .clamp(0, height as isize - 1) as usize;
                sum += src[(sy * width + x) * channels + c] * w;
            }
            row[x * channels + c] = sum;
        }
    }
}

fn blur_vertical(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    parallel: bool,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; src.len()];
    let row_len = width * channels;

    if parallel {
        dst.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                blur_column_pass_row(src, row, y, width, height, channels, kernel)
            });
    } else {
        for (y, row) in dst.chunks_mut(row_len).enumerate() {
            blur_column_pass_row(src, row, y, width, height, channels, kernel);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = gaussian_kernel(BLUR_RADIUS, BLUR_SIGMA);
        assert_eq!(kernel.len(), 5);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        // Symmetric, peaked at the center.
        assert!((kernel[0] - kernel[4]).abs() < 1e-7);
        assert!((kernel[1] - kernel[3]).abs() < 1e-7);
        assert!(kernel[2] > kernel[1]);
    }

    #[test]
    fn test_constant_image_unchanged() {
        let src = vec![0.5f32; 16 * 16 * 3];
        let out = gaussian_blur(&src, 16, 16, 3, true).unwrap();
        for v in out {
            assert!((v - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_blur_smooths_impulse() {
        let mut src = vec![0.0f32; 9 * 9];
        src[4 * 9 + 4] = 1.0;
        let out = gaussian_blur(&src, 9, 9, 1, false).unwrap();
        // Center keeps the largest share; energy is conserved.
        let center = out[4 * 9 + 4];
        assert!(center < 1.0 && center > 0.1);
        let total: f32 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        // Neighbors received energy.
        assert!(out[4 * 9 + 5] > 0.0);
        assert!(out[3 * 9 + 4] > 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let src: Vec<f32> = (0..32 * 24 * 3).map(|i| (i % 97) as f32 / 96.0).collect();
        let par = gaussian_blur(&src, 32, 24, 3, true).unwrap();
        let seq = gaussian_blur(&src, 32, 24, 3, false).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_edge_clamp_no_darkening() {
        // A constant bright edge must not darken: clamped indexing reuses
        // the edge pixel instead of sampling zeros.
        let src = vec![1.0f32; 8 * 8];
        let out = gaussian_blur(&src, 8, 8, 1, false).unwrap();
        for v in out {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dimension_validation() {
        assert!(gaussian_blur(&[0.0; 10], 2, 2, 3, false).is_err());
        assert!(gaussian_blur(&[], 0, 4, 3, false).is_err());
    }
}
