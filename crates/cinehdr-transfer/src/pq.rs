//! SMPTE ST 2084 Perceptual Quantizer (PQ) transfer function.
//!
//! PQ encodes luminance up to 10,000 cd/m2 in a perceptually uniform way
//! and is the encoding side of the engine's working domain.
//!
//! # Range and edge behavior
//!
//! - Encoded: [0, 1]
//! - Linear: [0, 10000] cd/m2 (nits)
//! - `eotf(v <= 0) = 0`, `eotf(v >= 1) = 10000`, `eotf(non-finite) = 0`
//! - `oetf` is the right inverse with the same edge behavior
//!
//! The clamped edges mean the pair never produces a non-finite value, which
//! the rest of the pipeline relies on.
//!
//! # Reference
//!
//! SMPTE ST 2084:2014
//!
//! # Usage
//!
//! ```rust
//! use cinehdr_transfer::pq;
//!
//! // Decode PQ signal to absolute luminance
//! let nits = pq::eotf(0.508);
//! assert!((nits - 100.0).abs() < 1.0);
//!
//! // Encode luminance to PQ
//! let signal = pq::oetf(100.0);
//! assert!((signal - 0.508).abs() < 0.01);
//! ```

/// Maximum luminance in cd/m2 (nits).
pub const L_MAX: f32 = 10000.0;

// PQ constants from SMPTE ST 2084
const M1: f32 = 0.1593017578125; // 2610 / 16384
const M2: f32 = 78.84375; // 2523 / 32
const C1: f32 = 0.8359375; // 3424 / 4096
const C2: f32 = 18.8515625; // 2413 / 128
const C3: f32 = 18.6875; // 2392 / 128

/// PQ EOTF: decodes a PQ signal to absolute luminance (cd/m2).
///
/// # Arguments
///
/// * `v` - PQ encoded value [0, 1]
///
/// # Returns
///
/// Absolute luminance in cd/m2, clamped to [0, 10000]. Non-finite input
/// decodes to 0.
#[inline]
pub fn eotf(v: f32) -> f32 {
    if !v.is_finite() || v <= 0.0 {
        return 0.0;
    }
    if v >= 1.0 {
        return L_MAX;
    }

    let vp = v.powf(1.0 / M2);
    let num = (vp - C1).max(0.0);
    let den = C2 - C3 * vp;
    if den <= 0.0 {
        return L_MAX;
    }

    L_MAX * (num / den).powf(1.0 / M1)
}

/// PQ OETF: encodes absolute luminance to a PQ signal.
///
/// # Arguments
///
/// * `l` - Luminance in cd/m2 [0, 10000]
///
/// # Returns
///
/// PQ encoded value in [0, 1]. Non-finite input encodes to 0.
#[inline]
pub fn oetf(l: f32) -> f32 {
    if !l.is_finite() || l <= 0.0 {
        return 0.0;
    }

    let y = (l / L_MAX).min(1.0);
    let yp = y.powf(M1);
    let num = C1 + C2 * yp;
    let den = 1.0 + C3 * yp;
    if den <= 0.0 {
        return 1.0;
    }

    (num / den).powf(M2)
}

/// Normalized PQ EOTF: decodes a PQ signal to full-scale linear [0, 1].
///
/// 1.0 corresponds to the 10000 cd/m2 PQ peak.
#[inline]
pub fn eotf_normalized(v: f32) -> f32 {
    eotf(v) / L_MAX
}

/// Normalized PQ OETF: encodes full-scale linear [0, 1] to a PQ signal.
#[inline]
pub fn oetf_normalized(l: f32) -> f32 {
    oetf(l * L_MAX)
}

/// Applies the PQ EOTF per channel, returning luminance in nits.
#[inline]
pub fn eotf_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [eotf(rgb[0]), eotf(rgb[1]), eotf(rgb[2])]
}

/// Applies the PQ OETF per channel.
#[inline]
pub fn oetf_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [oetf(rgb[0]), oetf(rgb[1]), oetf(rgb[2])]
}

/// Applies the normalized PQ EOTF per channel.
#[inline]
pub fn eotf_normalized_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [
        eotf_normalized(rgb[0]),
        eotf_normalized(rgb[1]),
        eotf_normalized(rgb[2]),
    ]
}

/// Applies the normalized PQ OETF per channel.
#[inline]
pub fn oetf_normalized_rgb(rgb: [f32; 3]) -> [f32; 3] {
    [
        oetf_normalized(rgb[0]),
        oetf_normalized(rgb[1]),
        oetf_normalized(rgb[2]),
    ]
}
