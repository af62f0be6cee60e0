//! Per-frame processing statistics.
//!
//! The engine publishes trimmed MaxRGB statistics for every processed frame
//! together with the tone curve's self-check flags. Trimming drops 1% of
//! samples from each tail so isolated speculars and dead pixels do not
//! dominate the range.

use std::time::SystemTime;

/// Trimmed MaxRGB statistics in the PQ-normalized domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxRgbStats {
    /// 1%-trimmed minimum.
    pub min: f32,
    /// Trimmed mean.
    pub avg: f32,
    /// 1%-trimmed maximum.
    pub max: f32,
    /// Variance of the trimmed sample set.
    pub variance: f32,
}

impl Default for MaxRgbStats {
    fn default() -> Self {
        Self {
            min: 0.0,
            avg: 0.0,
            max: 1.0,
            variance: 0.0,
        }
    }
}

impl MaxRgbStats {
    /// Computes 1%-trimmed statistics from a set of MaxRGB samples.
    ///
    /// Non-finite samples are excluded before trimming. Returns `None`
    /// when no finite samples remain.
    pub fn from_samples(samples: &[f32]) -> Option<Self> {
        let mut values: Vec<f32> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.partial_cmp(b).expect("finite samples"));

        let trim = values.len() / 100;
        let start = trim;
        let end = values.len() - trim;
        if start >= end {
            return None;
        }
        let trimmed = &values[start..end];

        let min = trimmed[0];
        let max = trimmed[trimmed.len() - 1];
        let sum: f32 = trimmed.iter().sum();
        let avg = sum / trimmed.len() as f32;
        let variance =
            trimmed.iter().map(|v| (v - avg) * (v - avg)).sum::<f32>() / trimmed.len() as f32;

        Some(Self {
            min,
            avg,
            max,
            variance,
        })
    }
}

/// Engine statistics snapshot.
///
/// # Example
///
/// ```rust
/// use cinehdr_core::Statistics;
///
/// let stats = Statistics::default();
/// assert_eq!(stats.frame_count, 0);
/// assert!(stats.monotonic);
/// assert!(stats.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Trimmed MaxRGB statistics of the most recent output frame.
    pub max_rgb: MaxRgbStats,
    /// Result of the first-frame monotonicity self-check.
    pub monotonic: bool,
    /// Result of the first-frame C1 continuity self-check.
    pub c1_continuous: bool,
    /// Largest derivative gap observed by the C1 self-check.
    pub max_derivative_gap: f32,
    /// Cumulative processed-frame count since the last reset.
    pub frame_count: u64,
    /// Wall-clock time of the last statistics update.
    pub last_update: Option<SystemTime>,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            max_rgb: MaxRgbStats::default(),
            monotonic: true,
            c1_continuous: true,
            max_derivative_gap: 0.0,
            frame_count: 0,
            last_update: None,
        }
    }
}

impl Statistics {
    /// Resets to the post-initialization state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a new frame's trimmed statistics.
    pub fn record_frame(&mut self, max_rgb: Option<MaxRgbStats>) {
        if let Some(stats) = max_rgb {
            self.max_rgb = stats;
        }
        self.frame_count += 1;
        self.last_update = Some(SystemTime::now());
    }

    /// Internal consistency predicate: ranges, ordering, finiteness.
    pub fn is_consistent(&self) -> bool {
        let s = &self.max_rgb;
        s.min.is_finite()
            && s.avg.is_finite()
            && s.max.is_finite()
            && s.variance.is_finite()
            && (0.0..=1.0).contains(&s.min)
            && (0.0..=1.0).contains(&s.avg)
            && (0.0..=1.0).contains(&s.max)
            && s.variance >= 0.0
            && s.min <= s.avg
            && s.avg <= s.max
            && self.max_derivative_gap >= 0.0
            && self.max_derivative_gap.is_finite()
    }
}
