//! Temporal frequency-band (flicker) analysis.
//!
//! Highlight sharpening can turn frame-to-frame noise into visible
//! flicker. The constraint: at 16 fixed sample points, the energy in the
//! 1-6 Hz band of the luminance time series must not exceed 20% of the
//! total spectrum energy. 1-6 Hz is where human flicker sensitivity
//! peaks, which is why the band is fixed rather than configurable.
//!
//! The spectrum comes from a real FFT over the sampled series
//! (`rustfft`); band energies are summed over half-spectrum magnitude
//! squares.

use cinehdr_core::Frame;
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::debug;

/// Maximum admissible 1-6 Hz band share of total spectrum energy.
pub const BAND_ENERGY_LIMIT: f32 = 0.2;

/// Lower edge of the scrutinized band (Hz).
pub const BAND_LOW_HZ: f32 = 1.0;

/// Upper edge of the scrutinized band (Hz).
pub const BAND_HIGH_HZ: f32 = 6.0;

/// Number of fixed sample points (4x4 grid).
const SAMPLE_GRID: usize = 4;

/// Verifies the temporal-frequency constraint over a frame sequence.
///
/// Returns `true` when the constraint holds (or cannot be evaluated:
/// fewer than 3 frames, or a degenerate fps). Sample points form a 4x4
/// grid offset by an eighth of the frame in each axis.
///
/// # Example
///
/// ```rust
/// use cinehdr_core::{ColorSpaceTag, Frame};
/// use cinehdr_ops::flicker::check_sequence;
///
/// let frames: Vec<Frame> = (0..8)
///     .map(|_| Frame::filled(8, 8, [0.5, 0.5, 0.5], ColorSpaceTag::Bt2020Pq))
///     .collect();
/// assert!(check_sequence(&frames, 24.0));
/// ```
pub fn check_sequence(frames: &[Frame], fps: f32) -> bool {
    if frames.len() < 3 || !fps.is_finite() || fps <= 0.0 {
        return true;
    }

    let width = frames[0].width();
    let height = frames[0].height();
    if width == 0 || height == 0 {
        return true;
    }

    for i in 0..SAMPLE_GRID * SAMPLE_GRID {
        let x = (i % SAMPLE_GRID) * width / SAMPLE_GRID + width / 8;
        let y = (i / SAMPLE_GRID) * height / SAMPLE_GRID + height / 8;
        let x = x.min(width - 1);
        let y = y.min(height - 1);

        let series: Vec<f32> = frames
            .iter()
            .filter(|f| f.width() == width && f.height() == height)
            .map(|f| f.max_rgb(x, y))
            .collect();
        if series.len() < 3 {
            continue;
        }

        let spectrum = temporal_spectrum(&series);
        let band = band_energy(&spectrum, fps, BAND_LOW_HZ, BAND_HIGH_HZ);
        let total = band_energy(&spectrum, fps, 0.0, fps / 2.0);

        if total > 0.0 {
            let ratio = band / total;
            if ratio > BAND_ENERGY_LIMIT {
                debug!(x, y, ratio, "flicker band energy exceeded");
                return false;
            }
        }
    }

    true
}

/// Half-spectrum magnitudes of a luminance time series.
pub fn temporal_spectrum(series: &[f32]) -> Vec<f32> {
    let n = series.len();
    let mut buffer: Vec<Complex<f32>> = series.iter().map(|&v| Complex::new(v, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer.iter().take(n / 2 + 1).map(|c| c.norm()).collect()
}

/// Sum of squared magnitudes for bins whose frequency falls in
/// `[low_hz, high_hz]`.
pub fn band_energy(spectrum: &[f32], fps: f32, low_hz: f32, high_hz: f32) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }
    // Bin k of an N-point series covers k * fps / N Hz; the half spectrum
    // has N/2 + 1 bins up to Nyquist.
    let n = (spectrum.len() - 1) * 2;
    if n == 0 {
        return 0.0;
    }

    let mut energy = 0.0f32;
    for (k, &mag) in spectrum.iter().enumerate() {
        let freq = k as f32 * fps / n as f32;
        if freq >= low_hz && freq <= high_hz {
            energy += mag * mag;
        }
    }
    energy
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinehdr_core::ColorSpaceTag;

    fn uniform_frame(v: f32) -> Frame {
        Frame::filled(16, 16, [v, v, v], ColorSpaceTag::Bt2020Pq)
    }

    #[test]
    fn test_short_sequences_pass() {
        let frames = vec![uniform_frame(0.5), uniform_frame(0.9)];
        assert!(check_sequence(&frames, 24.0));
        assert!(check_sequence(&[], 24.0));
    }

    #[test]
    fn test_static_sequence_passes() {
        let frames: Vec<Frame> = (0..24).map(|_| uniform_frame(0.5)).collect();
        assert!(check_sequence(&frames, 24.0));
    }

    #[test]
    fn test_slow_drift_passes() {
        // A monotone ramp concentrates energy at DC and the lowest bin.
        let frames: Vec<Frame> = (0..24)
            .map(|i| uniform_frame(0.3 + 0.01 * i as f32))
            .collect();
        assert!(check_sequence(&frames, 24.0));
    }

    #[test]
    fn test_strong_3hz_blink_fails() {
        // Hard 3 Hz square wave between 0.05 and 0.95 at 24 fps: the
        // fundamental and its in-band harmonics carry well over 20% of
        // the spectrum energy.
        let frames: Vec<Frame> = (0..24)
            .map(|i| {
                let v = if (i / 4) % 2 == 0 { 0.05 } else { 0.95 };
                uniform_frame(v)
            })
            .collect();
        assert!(!check_sequence(&frames, 24.0));
    }

    #[test]
    fn test_high_frequency_shimmer_passes() {
        // 12 Hz alternation sits above the scrutinized band.
        let frames: Vec<Frame> = (0..24)
            .map(|i| {
                let v = if i % 2 == 0 { 0.45 } else { 0.55 };
                uniform_frame(v)
            })
            .collect();
        assert!(check_sequence(&frames, 24.0));
    }

    #[test]
    fn test_band_energy_bins() {
        // 24-point series at 24 fps: bin k covers k Hz.
        let mut spectrum = vec![0.0f32; 13];
        spectrum[0] = 3.0;
        spectrum[3] = 2.0;
        spectrum[9] = 1.0;
        let band = band_energy(&spectrum, 24.0, 1.0, 6.0);
        assert!((band - 4.0).abs() < 1e-6);
        let total = band_energy(&spectrum, 24.0, 0.0, 12.0);
        assert!((total - 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_of_constant_is_dc_only() {
        let spectrum = temporal_spectrum(&[0.5; 16]);
        assert!((spectrum[0] - 8.0).abs() < 1e-4);
        for &m in &spectrum[1..] {
            assert!(m.abs() < 1e-4);
        }
    }
}
