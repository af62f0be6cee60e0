//! # cinehdr-ops
//!
//! Spatial and temporal image operations for the CineHDR engine.
//!
//! # Modules
//!
//! - [`blur`] - separable Gaussian blur with clamped edges
//! - [`detail`] - pivot-masked highlight USM with motion protection
//! - [`flicker`] - temporal frequency-band analysis (1-6 Hz constraint)
//!
//! # Example
//!
//! ```rust
//! use cinehdr_core::{ColorSpaceTag, Frame};
//! use cinehdr_ops::detail::HighlightDetail;
//!
//! let frame = Frame::filled(16, 16, [0.5, 0.5, 0.5], ColorSpaceTag::Bt2020Pq);
//! let mut detail = HighlightDetail::new(0.2, false);
//! let out = detail.process(&frame, 0.18).unwrap();
//! assert!(out.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blur;
pub mod detail;
pub mod flicker;

pub use detail::HighlightDetail;
pub use error::{OpsError, OpsResult};
