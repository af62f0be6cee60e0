//! # cinehdr-color
//!
//! Color primitives for the CineHDR pipeline.
//!
//! This crate covers everything between the tone curve and the frame
//! boundaries:
//!
//! - [`matrices`] - the frozen 3x3 matrix set of the working domain
//! - [`oklab`] - OKLab conversions with a sign-preserving cube root
//! - [`working`] - conversion to/from the BT.2020 + PQ working domain
//! - [`saturation`] - perceptual saturation shaping in OKLab
//! - [`gamut`] - the two-stage gamut processor (linear + perceptual)
//!
//! # Working domain
//!
//! The pipeline's internal space is BT.2020 primaries with PQ-normalized
//! encoding. Linear-light color spaces (P3-D65, ACEScg) carry full-scale
//! normalized linear values where 1.0 corresponds to the 10000 cd/m2 PQ
//! peak, keeping entry and exit symmetric.
//!
//! # Usage
//!
//! ```rust
//! use cinehdr_color::oklab;
//!
//! let rgb = [0.4, 0.3, 0.2];
//! let lab = oklab::rgb_to_oklab(rgb);
//! let back = oklab::oklab_to_rgb(lab);
//! for c in 0..3 {
//!     assert!((back[c] - rgb[c]).abs() < 1e-3);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod gamut;
pub mod matrices;
pub mod oklab;
pub mod saturation;
pub mod working;

pub use gamut::apply_gamut_processing;
pub use saturation::apply_saturation;
pub use working::{from_working, to_working};
