//! # cinehdr-core
//!
//! Core types for the CineHDR tone-mapping engine.
//!
//! This crate provides the foundational types used throughout the CineHDR
//! workspace:
//!
//! - [`ColorSpaceTag`] - runtime color space tags with gamut metadata
//! - [`Frame`] - dense row-major f32 image buffer with a color space tag
//! - [`Params`] - the artistic parameter bundle with range validation
//! - [`Statistics`] - per-frame trimmed MaxRGB statistics and curve flags
//! - [`ErrorCode`], [`ErrorReport`], [`FallbackTier`] - the error taxonomy
//! - [`ErrorHandler`] - mutex-guarded reporting with log throttling
//!
//! ## Crate structure
//!
//! `cinehdr-core` sits at the bottom of the workspace; every other CineHDR
//! crate depends on it:
//!
//! ```text
//! cinehdr-core (this crate)
//!    ^
//!    |
//!    +-- cinehdr-tone (curves read Params)
//!    +-- cinehdr-color (conversions read Frame + ColorSpaceTag)
//!    +-- cinehdr-ops (detail processing reads Frame)
//!    +-- cinehdr-engine (orchestration)
//! ```
//!
//! ## Error handling model
//!
//! Detection sites report through an [`ErrorHandler`], which classifies the
//! code into a [`FallbackTier`], throttles repeated diagnostics, and invokes
//! an optional user callback. A lazily initialized process-wide handler is
//! available via [`handler::global`], but every engine entry point accepts an
//! explicit handler so tests never touch global state.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod colorspace;
pub mod error;
pub mod frame;
pub mod handler;
pub mod params;
pub mod stats;

pub use colorspace::ColorSpaceTag;
pub use error::{CoreError, ErrorCode, ErrorReport, FallbackTier, Result, Severity};
pub use frame::Frame;
pub use handler::{ErrorHandler, ThrottleSummary};
pub use params::{CurveKind, Params};
pub use stats::{MaxRgbStats, Statistics};
