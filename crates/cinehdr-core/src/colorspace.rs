//! Runtime color space tags.
//!
//! Frames carry their color space as a runtime tag: the engine is driven by
//! host applications that decide the space per clip, so the tag cannot be a
//! compile-time type parameter.
//!
//! Each tag knows its gamut box, which the two-stage gamut processor uses as
//! its containment predicate. Standard display gamuts use [0, 1]; ACEScg is
//! scene-referred and permits the wider [-0.5, 2.0] range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color spaces the pipeline accepts at its boundaries.
///
/// The working domain is always [`ColorSpaceTag::Bt2020Pq`]; the other tags
/// describe input/output frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorSpaceTag {
    /// BT.2020 primaries, PQ-normalized encoding. The working domain.
    #[default]
    #[serde(rename = "BT2020_PQ")]
    Bt2020Pq,
    /// P3 primaries with D65 white point, linear light.
    #[serde(rename = "P3_D65")]
    P3D65,
    /// ACEScg (AP1 primaries), linear light, scene-referred.
    #[serde(rename = "ACESG")]
    AcesCg,
    /// ITU-R BT.709, display-referred.
    #[serde(rename = "REC709")]
    Rec709,
}

impl ColorSpaceTag {
    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bt2020Pq => "BT2020_PQ",
            Self::P3D65 => "P3_D65",
            Self::AcesCg => "ACEScg",
            Self::Rec709 => "REC709",
        }
    }

    /// Per-channel gamut box as `(min, max)`.
    ///
    /// Stage-1 gamut compression and the perceptual clamp both test against
    /// this box.
    pub const fn gamut_bounds(self) -> (f32, f32) {
        match self {
            Self::AcesCg => (-0.5, 2.0),
            _ => (0.0, 1.0),
        }
    }

    /// True for scene-referred spaces whose gamut box extends past [0, 1].
    pub const fn is_permissive(self) -> bool {
        matches!(self, Self::AcesCg)
    }

    /// Returns true when `rgb` lies inside the gamut box.
    #[inline]
    pub fn contains(self, rgb: &[f32; 3]) -> bool {
        let (lo, hi) = self.gamut_bounds();
        rgb.iter().all(|&c| c >= lo && c <= hi)
    }

    /// Coordinate-clamps `rgb` into the gamut box.
    #[inline]
    pub fn clamp(self, rgb: &mut [f32; 3]) {
        let (lo, hi) = self.gamut_bounds();
        for c in rgb.iter_mut() {
            *c = c.clamp(lo, hi);
        }
    }
}

impl fmt::Display for ColorSpaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamut_bounds() {
        assert_eq!(ColorSpaceTag::Bt2020Pq.gamut_bounds(), (0.0, 1.0));
        assert_eq!(ColorSpaceTag::P3D65.gamut_bounds(), (0.0, 1.0));
        assert_eq!(ColorSpaceTag::Rec709.gamut_bounds(), (0.0, 1.0));
        assert_eq!(ColorSpaceTag::AcesCg.gamut_bounds(), (-0.5, 2.0));
    }

    #[test]
    fn test_contains() {
        assert!(ColorSpaceTag::P3D65.contains(&[0.0, 0.5, 1.0]));
        assert!(!ColorSpaceTag::P3D65.contains(&[0.0, 0.5, 1.1]));
        assert!(!ColorSpaceTag::P3D65.contains(&[-0.1, 0.5, 1.0]));
        assert!(ColorSpaceTag::AcesCg.contains(&[-0.3, 1.5, 2.0]));
        assert!(!ColorSpaceTag::AcesCg.contains(&[-0.6, 0.0, 0.0]));
    }

    #[test]
    fn test_clamp() {
        let mut rgb = [1.5, -0.2, 0.5];
        ColorSpaceTag::Bt2020Pq.clamp(&mut rgb);
        assert_eq!(rgb, [1.0, 0.0, 0.5]);

        let mut wide = [2.5, -1.0, 0.5];
        ColorSpaceTag::AcesCg.clamp(&mut wide);
        assert_eq!(wide, [2.0, -0.5, 0.5]);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ColorSpaceTag::P3D65).unwrap();
        assert_eq!(json, "\"P3_D65\"");
        let back: ColorSpaceTag = serde_json::from_str("\"ACESG\"").unwrap();
        assert_eq!(back, ColorSpaceTag::AcesCg);
    }
}
