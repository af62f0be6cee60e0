//! # cinehdr-math
//!
//! Numerical foundation for the CineHDR pipeline.
//!
//! This crate provides the three primitive layers every other CineHDR crate
//! builds on:
//!
//! - [`Mat3`] - 3x3 row-major matrix for color space transforms
//! - Interpolation helpers ([`lerp`], [`mix`], [`smoothstep`], [`saturate`])
//! - NaN/Inf-safe scalar operations ([`safe_pow`], [`safe_log`], [`safe_div`])
//!
//! # Numerical discipline
//!
//! Tone-curve and pipeline code never calls bare `powf`/`ln`/`/` on values
//! derived from pixel data. Every such operation routes through the `safe_*`
//! wrappers in this crate, which return a caller-chosen fallback instead of
//! propagating NaN or Inf.
//!
//! # Usage
//!
//! ```rust
//! use cinehdr_math::{safe_pow, smoothstep, Mat3};
//!
//! let y = safe_pow(0.5, 2.2, 0.0);
//! let w = smoothstep(0.0, 1.0, 0.25);
//! let rgb = Mat3::IDENTITY.transform([y, w, 0.0]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod interp;
pub mod mat3;
pub mod safe;

pub use interp::{inverse_lerp, lerp, mix, saturate, smoothstep};
pub use mat3::Mat3;
pub use safe::{is_finite, is_finite_rgb, safe_div, safe_log, safe_pow};
