//! OKLab conversions.
//!
//! OKLab is the perceptually uniform space the saturation stage and the
//! perceptual gamut clamp operate in: scaling the `a`/`b` channels changes
//! chroma without touching perceived lightness `L`.
//!
//! The conversion uses the published linear-RGB -> LMS matrices and a
//! **sign-preserving** cube root, `cbrt(x) = sign(x) * |x|^(1/3)`, so that
//! out-of-gamut values with negative LMS components survive the round trip
//! instead of collapsing. `f32::cbrt` has exactly this behavior.
//!
//! Non-finite inputs yield `(0, 0, 0)` in either direction.

use cinehdr_math::{is_finite_rgb, Mat3};

/// Linear RGB -> LMS cone response.
pub const RGB_TO_LMS: Mat3 = Mat3::from_rows([
    [0.4122214708, 0.5363325363, 0.0514459929],
    [0.2119034982, 0.6806995451, 0.1073969566],
    [0.0883024619, 0.2817188376, 0.6299787005],
]);

/// Nonlinear LMS -> OKLab.
pub const LMS_TO_OKLAB: Mat3 = Mat3::from_rows([
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
]);

/// OKLab -> nonlinear LMS.
pub const OKLAB_TO_LMS: Mat3 = Mat3::from_rows([
    [1.0, 0.3963377774, 0.2158037573],
    [1.0, -0.1055613458, -0.0638541728],
    [1.0, -0.0894841775, -1.2914855480],
]);

/// LMS cone response -> linear RGB.
pub const LMS_TO_RGB: Mat3 = Mat3::from_rows([
    [4.0767416621, -3.3077115913, 0.2309699292],
    [-1.2684380046, 2.6097574011, -0.3413193965],
    [-0.0041960863, -0.7034186147, 1.7076147010],
]);

/// Converts linear RGB to OKLab `(L, a, b)`.
///
/// # Example
///
/// ```rust
/// use cinehdr_color::oklab::rgb_to_oklab;
///
/// // White has L near 1 and no chroma.
/// let lab = rgb_to_oklab([1.0, 1.0, 1.0]);
/// assert!((lab[0] - 1.0).abs() < 1e-3);
/// assert!(lab[1].abs() < 1e-3 && lab[2].abs() < 1e-3);
/// ```
#[inline]
pub fn rgb_to_oklab(rgb: [f32; 3]) -> [f32; 3] {
    if !is_finite_rgb(&rgb) {
        return [0.0, 0.0, 0.0];
    }

    let lms = RGB_TO_LMS.transform(rgb);
    let lms_prime = [lms[0].cbrt(), lms[1].cbrt(), lms[2].cbrt()];
    let lab = LMS_TO_OKLAB.transform(lms_prime);

    if is_finite_rgb(&lab) {
        lab
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Converts OKLab `(L, a, b)` back to linear RGB.
#[inline]
pub fn oklab_to_rgb(lab: [f32; 3]) -> [f32; 3] {
    if !is_finite_rgb(&lab) {
        return [0.0, 0.0, 0.0];
    }

    let lms_prime = OKLAB_TO_LMS.transform(lab);
    let lms = [
        lms_prime[0] * lms_prime[0] * lms_prime[0],
        lms_prime[1] * lms_prime[1] * lms_prime[1],
        lms_prime[2] * lms_prime[2] * lms_prime[2],
    ];
    let rgb = LMS_TO_RGB.transform(lms);

    if is_finite_rgb(&rgb) {
        rgb
    } else {
        [0.0, 0.0, 0.0]
    }
}
