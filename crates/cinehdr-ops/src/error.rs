//! Error types for image operations.

use thiserror::Error;

/// Result type for image operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

/// Errors raised by spatial/temporal operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Buffer or image dimensions are unusable.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Two frames that must agree in size do not.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// A parameter is outside its usable range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
