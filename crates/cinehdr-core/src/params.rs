//! The artistic parameter bundle.
//!
//! [`Params`] is a flat record of every knob the engine exposes, together
//! with its admissible-range table. The bundle is validated (and when
//! necessary corrected) at initialization and re-checked per frame; after
//! initialization the engine treats its copy as immutable.
//!
//! # Ranges
//!
//! | field | range | default |
//! |---|---|---|
//! | `pivot_pq` | [0.05, 0.30] | 0.18 |
//! | `gamma_s` | [1.0, 1.6] | 1.25 |
//! | `gamma_h` | [0.8, 1.4] | 1.10 |
//! | `shoulder_h` | [0.5, 3.0] | 1.5 |
//! | `rlog_a` | [1.0, 16.0] | 8.0 |
//! | `rlog_b` | [0.8, 1.2] | 1.0 |
//! | `rlog_c` | [0.5, 3.0] | 1.5 |
//! | `rlog_t` | [0.4, 0.7] | 0.55 |
//! | `yknee` | [0.95, 0.99] | 0.97 |
//! | `alpha` | [0.2, 1.0] | 0.6 |
//! | `toe` | [0.0, 0.01] | 0.002 |
//! | `black_lift` | [0.0, 0.02] | 0.002 |
//! | `highlight_detail` | [0.0, 1.0] | 0.2 |
//! | `sat_base` | [0.0, 2.0] | 1.0 |
//! | `sat_hi` | [0.0, 2.0] | 0.95 |
//!
//! Out-of-range values are coordinate-clamped; non-finite values recover to
//! the midpoint of the range.
//!
//! # JSON
//!
//! The serde representation recognizes exactly the fields above (plus
//! `curve`, `dci_compliance`, `deterministic`). Unknown fields are rejected
//! and surface as `SCHEMA_MISSING`.

use crate::error::{CoreError, ErrorCode, Result};
use crate::handler::ErrorHandler;
use serde::{Deserialize, Serialize};

/// Which analytic tone curve the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveKind {
    /// Pivoted Power-Rational: power in shadows, rational in highlights,
    /// C1 blend around a mid-gray pivot.
    #[default]
    #[serde(rename = "PPR")]
    Ppr,
    /// Rational Logarithmic: logarithmic in shadows, rational in
    /// highlights, C1 splice at a threshold.
    #[serde(rename = "RLOG")]
    Rlog,
}

/// The engine parameter bundle.
///
/// # Example
///
/// ```rust
/// use cinehdr_core::Params;
///
/// let params = Params::default();
/// assert!(params.is_valid());
///
/// let mut broken = Params {
///     pivot_pq: f32::NAN,
///     ..Params::default()
/// };
/// broken.clamp_to_valid();
/// assert!((broken.pivot_pq - 0.175).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Params {
    /// Tone curve selector.
    pub curve: CurveKind,
    /// Mid-gray pivot in the PQ-normalized domain.
    pub pivot_pq: f32,
    /// PPR shadow exponent.
    pub gamma_s: f32,
    /// PPR highlight exponent.
    pub gamma_h: f32,
    /// PPR highlight denominator (shoulder strength).
    pub shoulder_h: f32,
    /// RLOG shadow log slope.
    pub rlog_a: f32,
    /// RLOG highlight numerator.
    pub rlog_b: f32,
    /// RLOG highlight denominator.
    pub rlog_c: f32,
    /// RLOG splice threshold.
    pub rlog_t: f32,
    /// Soft-knee onset.
    pub yknee: f32,
    /// Soft-knee strength.
    pub alpha: f32,
    /// Black-lift floor applied after the curve.
    pub toe: f32,
    /// Pre-toe dark lift. Carried and range-checked; reserved for the
    /// grading layer and not consumed by the published curve shape.
    pub black_lift: f32,
    /// Highlight-detail USM intensity.
    pub highlight_detail: f32,
    /// OKLab global saturation.
    pub sat_base: f32,
    /// OKLab highlight saturation.
    pub sat_hi: f32,
    /// DCI compliance: always engage the perceptual clamp and trim
    /// highlight saturation conservatively.
    pub dci_compliance: bool,
    /// Deterministic mode: fixed-order reductions, no fused/approximate
    /// arithmetic paths.
    pub deterministic: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            curve: CurveKind::Ppr,
            pivot_pq: 0.18,
            gamma_s: 1.25,
            gamma_h: 1.10,
            shoulder_h: 1.5,
            rlog_a: 8.0,
            rlog_b: 1.0,
            rlog_c: 1.5,
            rlog_t: 0.55,
            yknee: 0.97,
            alpha: 0.6,
            toe: 0.002,
            black_lift: 0.002,
            highlight_detail: 0.2,
            sat_base: 1.0,
            sat_hi: 0.95,
            dci_compliance: false,
            deterministic: false,
        }
    }
}

/// One row of the admissible-range table.
struct Range {
    min: f32,
    max: f32,
}

impl Range {
    const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn contains(&self, v: f32) -> bool {
        v.is_finite() && v >= self.min && v <= self.max
    }

    fn midpoint(&self) -> f32 {
        (self.min + self.max) * 0.5
    }
}

const PIVOT_PQ: Range = Range::new(0.05, 0.30);
const GAMMA_S: Range = Range::new(1.0, 1.6);
const GAMMA_H: Range = Range::new(0.8, 1.4);
const SHOULDER_H: Range = Range::new(0.5, 3.0);
const RLOG_A: Range = Range::new(1.0, 16.0);
const RLOG_B: Range = Range::new(0.8, 1.2);
const RLOG_C: Range = Range::new(0.5, 3.0);
const RLOG_T: Range = Range::new(0.4, 0.7);
const YKNEE: Range = Range::new(0.95, 0.99);
const ALPHA: Range = Range::new(0.2, 1.0);
const TOE: Range = Range::new(0.0, 0.01);
const BLACK_LIFT: Range = Range::new(0.0, 0.02);
const HIGHLIGHT_DETAIL: Range = Range::new(0.0, 1.0);
const SAT_BASE: Range = Range::new(0.0, 2.0);
const SAT_HI: Range = Range::new(0.0, 2.0);

impl Params {
    /// Parses a bundle from JSON.
    ///
    /// Recognizes exactly the documented fields; unknown fields and
    /// malformed input are rejected with [`CoreError::Schema`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use cinehdr_core::Params;
    ///
    /// let params = Params::from_json(r#"{"curve": "RLOG", "rlog_t": 0.6}"#).unwrap();
    /// assert!((params.rlog_t - 0.6).abs() < 1e-6);
    ///
    /// assert!(Params::from_json(r#"{"unknown_knob": 1.0}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::Schema(e.to_string()))
    }

    /// Serializes the bundle to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The **Cinema-Flat** preset: gentle mapping, natural look.
    pub fn cinema_flat() -> Self {
        Self {
            curve: CurveKind::Ppr,
            pivot_pq: 0.18,
            gamma_s: 1.10,
            gamma_h: 1.05,
            shoulder_h: 1.0,
            black_lift: 0.003,
            highlight_detail: 0.2,
            sat_base: 1.00,
            sat_hi: 0.95,
            ..Self::default()
        }
    }

    /// The **Cinema-Punch** preset: boosted contrast for commercial work.
    pub fn cinema_punch() -> Self {
        Self {
            curve: CurveKind::Ppr,
            pivot_pq: 0.18,
            gamma_s: 1.40,
            gamma_h: 1.10,
            shoulder_h: 1.8,
            black_lift: 0.002,
            highlight_detail: 0.4,
            sat_base: 1.05,
            sat_hi: 1.00,
            ..Self::default()
        }
    }

    /// The **Cinema-Highlight** preset: protects highlight detail in
    /// high-dynamic-range scenes.
    pub fn cinema_highlight() -> Self {
        Self {
            curve: CurveKind::Ppr,
            pivot_pq: 0.20,
            gamma_s: 1.20,
            gamma_h: 0.95,
            shoulder_h: 1.2,
            black_lift: 0.004,
            highlight_detail: 0.6,
            sat_base: 0.98,
            sat_hi: 0.92,
            ..Self::default()
        }
    }

    /// The default preset set, used by the curve self-check suite.
    pub fn presets() -> Vec<Params> {
        vec![
            Params::default(),
            Params::cinema_flat(),
            Params::cinema_punch(),
            Params::cinema_highlight(),
        ]
    }

    /// True when every field is finite and inside its admissible range.
    pub fn is_valid(&self) -> bool {
        PIVOT_PQ.contains(self.pivot_pq)
            && GAMMA_S.contains(self.gamma_s)
            && GAMMA_H.contains(self.gamma_h)
            && SHOULDER_H.contains(self.shoulder_h)
            && RLOG_A.contains(self.rlog_a)
            && RLOG_B.contains(self.rlog_b)
            && RLOG_C.contains(self.rlog_c)
            && RLOG_T.contains(self.rlog_t)
            && YKNEE.contains(self.yknee)
            && ALPHA.contains(self.alpha)
            && TOE.contains(self.toe)
            && BLACK_LIFT.contains(self.black_lift)
            && HIGHLIGHT_DETAIL.contains(self.highlight_detail)
            && SAT_BASE.contains(self.sat_base)
            && SAT_HI.contains(self.sat_hi)
    }

    /// Forces every field into its admissible range.
    ///
    /// Non-finite values recover to the range midpoint; finite
    /// out-of-range values coordinate-clamp to the nearest extreme.
    pub fn clamp_to_valid(&mut self) {
        fn fix(value: &mut f32, range: &Range) {
            if !value.is_finite() {
                *value = range.midpoint();
            }
            *value = value.clamp(range.min, range.max);
        }

        fix(&mut self.pivot_pq, &PIVOT_PQ);
        fix(&mut self.gamma_s, &GAMMA_S);
        fix(&mut self.gamma_h, &GAMMA_H);
        fix(&mut self.shoulder_h, &SHOULDER_H);
        fix(&mut self.rlog_a, &RLOG_A);
        fix(&mut self.rlog_b, &RLOG_B);
        fix(&mut self.rlog_c, &RLOG_C);
        fix(&mut self.rlog_t, &RLOG_T);
        fix(&mut self.yknee, &YKNEE);
        fix(&mut self.alpha, &ALPHA);
        fix(&mut self.toe, &TOE);
        fix(&mut self.black_lift, &BLACK_LIFT);
        fix(&mut self.highlight_detail, &HIGHLIGHT_DETAIL);
        fix(&mut self.sat_base, &SAT_BASE);
        fix(&mut self.sat_hi, &SAT_HI);
    }

    /// Validates and corrects the bundle in place, reporting every
    /// correction through `handler`.
    ///
    /// Unlike [`Params::clamp_to_valid`], an invalid field - whether out
    /// of range or non-finite - recovers to its range midpoint (sentinel
    /// recovery): an out-of-range value signals a broken upstream
    /// mapping, so the nearest extreme is no more trustworthy than the
    /// neutral center.
    ///
    /// Returns `true` when any field was changed. Corrections emit
    /// `RANGE_PIVOT` for the pivot (and other curve-shape fields),
    /// `RANGE_KNEE` for knee/alpha/toe, and `NAN_INF` for non-finite
    /// values.
    pub fn validate_and_correct(&mut self, handler: &ErrorHandler) -> bool {
        let mut corrected = false;

        corrected |= correct_field(
            &mut self.pivot_pq,
            &PIVOT_PQ,
            "pivot_pq",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.gamma_s,
            &GAMMA_S,
            "gamma_s",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.gamma_h,
            &GAMMA_H,
            "gamma_h",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.shoulder_h,
            &SHOULDER_H,
            "shoulder_h",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.rlog_a,
            &RLOG_A,
            "rlog_a",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.rlog_b,
            &RLOG_B,
            "rlog_b",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.rlog_c,
            &RLOG_C,
            "rlog_c",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.rlog_t,
            &RLOG_T,
            "rlog_t",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.yknee,
            &YKNEE,
            "yknee",
            ErrorCode::RangeKnee,
            handler,
        );
        corrected |= correct_field(
            &mut self.alpha,
            &ALPHA,
            "alpha",
            ErrorCode::RangeKnee,
            handler,
        );
        corrected |= correct_field(&mut self.toe, &TOE, "toe", ErrorCode::RangeKnee, handler);
        corrected |= correct_field(
            &mut self.black_lift,
            &BLACK_LIFT,
            "black_lift",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.highlight_detail,
            &HIGHLIGHT_DETAIL,
            "highlight_detail",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.sat_base,
            &SAT_BASE,
            "sat_base",
            ErrorCode::RangePivot,
            handler,
        );
        corrected |= correct_field(
            &mut self.sat_hi,
            &SAT_HI,
            "sat_hi",
            ErrorCode::RangePivot,
            handler,
        );

        corrected
    }
}

/// Validates one field, correcting it and reporting when necessary.
fn correct_field(
    value: &mut f32,
    range: &Range,
    name: &str,
    range_code: ErrorCode,
    handler: &ErrorHandler,
) -> bool {
    if !value.is_finite() {
        handler.report(
            ErrorCode::NanInf,
            "parameter is not finite",
            Some((name, *value)),
        );
        *value = range.midpoint();
        return true;
    }
    if *value < range.min || *value > range.max {
        handler.report(range_code, "parameter out of range", Some((name, *value)));
        *value = range.midpoint();
        return true;
    }
    false
}
