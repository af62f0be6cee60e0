//! Error taxonomy and typed errors.
//!
//! Two layers live here:
//!
//! - [`ErrorCode`] / [`ErrorReport`] - the diagnostic taxonomy the engine
//!   publishes to hosts. Every code maps to a [`Severity`] and a
//!   [`FallbackTier`]; the tier decides how much of the frame pipeline is
//!   replaced when the code fires.
//! - [`CoreError`] - the `thiserror` enum returned by fallible APIs
//!   (structural problems a caller must handle, as opposed to pixel-level
//!   conditions the pipeline absorbs via fallbacks).

use std::fmt;
use std::time::SystemTime;
use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Diagnostic codes published by the engine.
///
/// The set is fixed; hosts switch on it for reporting and batch exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No error.
    Success,
    /// Required external configuration absent or malformed.
    SchemaMissing,
    /// Pivot parameter out of range.
    RangePivot,
    /// Knee/alpha/toe parameter out of range, or curve self-check failure.
    RangeKnee,
    /// Non-finite intermediate detected.
    NanInf,
    /// Determinism cannot be guaranteed for the requested configuration.
    DetMismatch,
    /// Temporal frequency-band energy constraint exceeded.
    HlFlicker,
    /// DCI compliance check failed.
    DciBound,
    /// Perceptual gamut clamp did not converge.
    GamutOog,
}

impl ErrorCode {
    /// All codes that can carry diagnostics, in taxonomy order.
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Success,
        ErrorCode::SchemaMissing,
        ErrorCode::RangePivot,
        ErrorCode::RangeKnee,
        ErrorCode::NanInf,
        ErrorCode::DetMismatch,
        ErrorCode::HlFlicker,
        ErrorCode::DciBound,
        ErrorCode::GamutOog,
    ];

    /// Wire/display name of the code.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::SchemaMissing => "SCHEMA_MISSING",
            Self::RangePivot => "RANGE_PIVOT",
            Self::RangeKnee => "RANGE_KNEE",
            Self::NanInf => "NAN_INF",
            Self::DetMismatch => "DET_MISMATCH",
            Self::HlFlicker => "HL_FLICKER",
            Self::DciBound => "DCI_BOUND",
            Self::GamutOog => "GAMUT_OOG",
        }
    }

    /// Severity class of the code.
    pub const fn severity(self) -> Severity {
        match self {
            Self::Success => Severity::Info,
            Self::RangePivot | Self::RangeKnee | Self::DetMismatch | Self::HlFlicker => {
                Severity::Warning
            }
            Self::SchemaMissing | Self::NanInf | Self::DciBound | Self::GamutOog => Severity::Error,
        }
    }

    /// Fallback tier selected when this code fires.
    ///
    /// Returns `None` for [`ErrorCode::Success`].
    pub const fn fallback_tier(self) -> Option<FallbackTier> {
        match self {
            Self::Success => None,
            Self::RangePivot | Self::RangeKnee => Some(FallbackTier::ParameterCorrection),
            Self::SchemaMissing
            | Self::DetMismatch
            | Self::HlFlicker
            | Self::DciBound
            | Self::GamutOog => Some(FallbackTier::Standard),
            Self::NanInf => Some(FallbackTier::Hard),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational.
    Info,
    /// Degraded but recoverable.
    Warning,
    /// Frame-level failure.
    Error,
}

/// The three fallback tiers of the engine.
///
/// Ordered by how much of the pipeline is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FallbackTier {
    /// Tier 1: clamp the offending parameter and continue.
    ParameterCorrection,
    /// Tier 2: disable the extension path for the frame; emit a
    /// basic-layer-only result with the neutral default bundle.
    Standard,
    /// Tier 3: identity luminance, saturation and gamut bypassed; only the
    /// working-domain round-trip is applied.
    Hard,
}

impl FallbackTier {
    /// Action tag recorded on error reports for this tier.
    pub const fn action_tag(self) -> &'static str {
        match self {
            Self::ParameterCorrection => "PARAM_CORRECT",
            Self::Standard => "FALLBACK2094",
            Self::Hard => "IDENTITY",
        }
    }
}

/// A single diagnostic record.
///
/// Mutated at each error site; the handler retains the latest record and a
/// bounded history.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// Taxonomy code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Offending parameter/field name, when applicable.
    pub field_name: String,
    /// Offending value, when applicable.
    pub invalid_value: f32,
    /// Action tag (`PARAM_CORRECT`, `FALLBACK2094`, `IDENTITY`).
    pub action_taken: String,
    /// Host-supplied clip identifier.
    pub clip_id: String,
    /// Host-supplied timecode.
    pub timecode: String,
    /// Wall-clock time of the report.
    pub timestamp: SystemTime,
}

impl ErrorReport {
    /// Creates a report with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_name: String::new(),
            invalid_value: 0.0,
            action_taken: String::new(),
            clip_id: String::new(),
            timecode: String::new(),
            timestamp: SystemTime::now(),
        }
    }

    /// Attaches the offending field and value.
    pub fn with_field(mut self, field: impl Into<String>, value: f32) -> Self {
        self.field_name = field.into();
        self.invalid_value = value;
        self
    }

    /// Attaches clip context.
    pub fn with_clip(mut self, clip_id: impl Into<String>, timecode: impl Into<String>) -> Self {
        self.clip_id = clip_id.into();
        self.timecode = timecode.into();
        self
    }

    /// True for any code other than [`ErrorCode::Success`].
    pub fn is_error(&self) -> bool {
        self.code != ErrorCode::Success
    }
}

impl Default for ErrorReport {
    fn default() -> Self {
        Self::new(ErrorCode::Success, "")
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.field_name.is_empty() {
            write!(f, " (field={}, value={})", self.field_name, self.invalid_value)?;
        }
        if !self.action_taken.is_empty() {
            write!(f, " action={}", self.action_taken)?;
        }
        if !self.clip_id.is_empty() {
            write!(f, " clip={}", self.clip_id)?;
        }
        if !self.timecode.is_empty() {
            write!(f, " tc={}", self.timecode)?;
        }
        Ok(())
    }
}

/// Structural errors returned by fallible CineHDR APIs.
///
/// These are conditions a caller must handle, unlike pixel-level conditions
/// which the pipeline absorbs through the fallback tiers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Buffer length does not match the declared dimensions.
    #[error("buffer length mismatch: expected {expected} samples, got {got}")]
    DimensionMismatch {
        /// Expected sample count.
        expected: usize,
        /// Actual sample count.
        got: usize,
    },

    /// Two frames that must agree in size do not.
    #[error("frame size mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    FrameSizeMismatch {
        /// First frame width.
        a_width: usize,
        /// First frame height.
        a_height: usize,
        /// Second frame width.
        b_width: usize,
        /// Second frame height.
        b_height: usize,
    },

    /// A frame failed its own validity predicate.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Parameter bundle rejected at initialization.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The engine was used before a successful `init`.
    #[error("engine not initialized")]
    NotInitialized,

    /// Parameter JSON carried unknown fields or failed to parse.
    ///
    /// Surfaced to hosts as `SCHEMA_MISSING`.
    #[error("parameter schema error: {0}")]
    Schema(String),
}

impl CoreError {
    /// Taxonomy code associated with this structural error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Schema(_) => ErrorCode::SchemaMissing,
            Self::InvalidParams(_) => ErrorCode::RangePivot,
            Self::DimensionMismatch { .. }
            | Self::FrameSizeMismatch { .. }
            | Self::InvalidFrame(_) => ErrorCode::NanInf,
            Self::NotInitialized => ErrorCode::SchemaMissing,
        }
    }
}
