//! # cinehdr-tone
//!
//! Analytic tone curves for the CineHDR engine.
//!
//! Two curve families are provided, both operating on the PQ-normalized
//! luminance proxy in [0, 1]:
//!
//! - **PPR** (Pivoted Power-Rational): a power law in the shadows and a
//!   rational shoulder in the highlights, blended smoothly around a
//!   mid-gray pivot.
//! - **RLOG** (Rational Logarithmic): a normalized logarithm in the
//!   shadows spliced onto a scaled rational highlight branch at a
//!   threshold.
//!
//! Every evaluation finishes with a soft knee near white, a toe floor near
//! black, and a final clamp to [0, 1].
//!
//! # Guarantees
//!
//! For every admissible parameter bundle the curve is non-decreasing on
//! [0, 1], maps 0 to 0, and stays inside [0, 1]. The [`validate`] module
//! provides the samplers that check these properties numerically; the
//! engine runs them once per (re)initialization.
//!
//! # Usage
//!
//! ```rust
//! use cinehdr_core::Params;
//! use cinehdr_tone::ToneCurve;
//!
//! let curve = ToneCurve::new(&Params::default());
//! let y = curve.apply(0.5);
//! assert!(y > 0.0 && y <= 1.0);
//! assert_eq!(curve.apply(0.0), 0.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod curve;
pub mod knee;
pub mod ppr;
pub mod rlog;
pub mod validate;

pub use curve::ToneCurve;
pub use knee::{soft_knee, toe_clamp};
pub use validate::{CurveCheck, C1_EPSILON, C1_GAP_THRESHOLD};
