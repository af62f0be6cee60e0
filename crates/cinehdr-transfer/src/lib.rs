//! # cinehdr-transfer
//!
//! Transfer functions for the CineHDR working domain.
//!
//! The pipeline's internal processing space is BT.2020 primaries with
//! PQ-normalized encoding, so the only transfer pair the engine needs is
//! SMPTE ST 2084:
//!
//! - **EOTF**: PQ signal [0, 1] -> absolute luminance [0, 10000] cd/m2
//! - **OETF**: absolute luminance -> PQ signal (right inverse of the EOTF)
//!
//! # Usage
//!
//! ```rust
//! use cinehdr_transfer::pq;
//!
//! let nits = pq::eotf(0.5);
//! let signal = pq::oetf(nits);
//! assert!((signal - 0.5).abs() < 5e-5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod pq;

pub use pq::{eotf as pq_eotf, oetf as pq_oetf};
