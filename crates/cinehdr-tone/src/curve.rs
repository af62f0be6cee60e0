//! The compiled tone-curve evaluator.
//!
//! [`ToneCurve`] snapshots the curve-relevant fields of a parameter bundle
//! at construction; the engine clones one per initialization and treats it
//! as immutable afterwards. Evaluation composes the selected curve family
//! with the soft knee, the toe clamp, and a final range clamp.

use crate::knee::{soft_knee, toe_clamp};
use crate::{ppr, rlog};
use cinehdr_core::{CurveKind, Params};
use cinehdr_math::saturate;

/// A compiled tone curve.
///
/// # Example
///
/// ```rust
/// use cinehdr_core::Params;
/// use cinehdr_tone::ToneCurve;
///
/// let curve = ToneCurve::new(&Params::default());
/// assert_eq!(curve.apply(0.0), 0.0);
/// assert_eq!(curve.apply(f32::NAN), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ToneCurve {
    kind: CurveKind,
    pivot: f32,
    gamma_s: f32,
    gamma_h: f32,
    shoulder: f32,
    rlog_a: f32,
    rlog_b: f32,
    rlog_c: f32,
    rlog_t: f32,
    yknee: f32,
    alpha: f32,
    toe: f32,
}

impl ToneCurve {
    /// Compiles a curve from a parameter bundle.
    ///
    /// The bundle is expected to be validated; out-of-range values do not
    /// panic but void the monotonicity guarantee.
    pub fn new(params: &Params) -> Self {
        Self {
            kind: params.curve,
            pivot: params.pivot_pq,
            gamma_s: params.gamma_s,
            gamma_h: params.gamma_h,
            shoulder: params.shoulder_h,
            rlog_a: params.rlog_a,
            rlog_b: params.rlog_b,
            rlog_c: params.rlog_c,
            rlog_t: params.rlog_t,
            yknee: params.yknee,
            alpha: params.alpha,
            toe: params.toe,
        }
    }

    /// Which curve family this evaluator runs.
    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Pivot (PPR) or splice threshold (RLOG) of the compiled curve.
    ///
    /// This is the center of the region the focused validator samples.
    pub fn critical_point(&self) -> f32 {
        match self.kind {
            CurveKind::Ppr => self.pivot,
            CurveKind::Rlog => self.rlog_t,
        }
    }

    /// Evaluates the curve at `x`.
    ///
    /// Input is clamped to [0, 1]; non-finite input maps to 0. The result
    /// is always inside [0, 1].
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        if !x.is_finite() {
            return 0.0;
        }
        let x = x.clamp(0.0, 1.0);

        let y = match self.kind {
            CurveKind::Ppr => ppr::eval(x, self.pivot, self.gamma_s, self.gamma_h, self.shoulder),
            CurveKind::Rlog => rlog::eval(x, self.rlog_a, self.rlog_b, self.rlog_c, self.rlog_t),
        };

        let y = soft_knee(y, self.yknee, self.alpha);
        let y = toe_clamp(y, self.toe);
        saturate(y)
    }

    /// Evaluates the curve over a luminance slice in place.
    pub fn apply_batch(&self, luminance: &mut [f32]) {
        for v in luminance.iter_mut() {
            *v = self.apply(*v);
        }
    }
}
