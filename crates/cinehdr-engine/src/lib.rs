//! # cinehdr-engine
//!
//! Frame-pipeline orchestration for the CineHDR tone-mapping engine.
//!
//! [`Processor`] wires the lower crates into the per-frame pipeline:
//!
//! ```text
//! input (CS_in)
//!   -> working domain (BT.2020 + PQ normalized)
//!   -> tone curve on the MaxRGB luminance proxy
//!   -> highlight-detail USM (above the pivot)
//!   -> OKLab saturation
//!   -> two-stage gamut processing
//!   -> output (CS_out)
//! ```
//!
//! Every stage re-validates its intermediates; violations route through
//! the error handler, which selects one of three fallback tiers:
//! parameter correction, a neutral basic-layer rendering, or an identity
//! luminance pass. A frame is always emitted - downstream timing is never
//! disturbed by a fallback.
//!
//! # Usage
//!
//! ```rust
//! use cinehdr_core::{ColorSpaceTag, Frame, Params};
//! use cinehdr_engine::Processor;
//!
//! let mut processor = Processor::new();
//! processor.init(Params::cinema_flat()).unwrap();
//!
//! let input = Frame::filled(8, 8, [0.5, 0.5, 0.5], ColorSpaceTag::Bt2020Pq);
//! let output = processor.process_frame(&input).unwrap();
//! assert!(output.is_valid());
//!
//! let stats = processor.statistics();
//! assert_eq!(stats.frame_count, 1);
//! assert!(stats.monotonic);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod processor;

pub use processor::Processor;
