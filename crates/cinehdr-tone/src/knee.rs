//! Soft knee and toe clamp.
//!
//! Both are applied after curve evaluation: the knee smoothly compresses
//! values approaching 1.0 instead of hard-clipping them, and the toe puts a
//! floor under near-black values while preserving `f(0) = 0`.

/// Soft-knee compression above `yknee`.
///
/// For `y <= yknee` the value passes through. Above the knee the excess is
/// compressed rationally:
///
/// ```text
/// n  = (y - yknee) / (1 - yknee)
/// y' = yknee + (1 - yknee) * n / (1 + alpha * n)
/// ```
///
/// The mapping is monotone, never expands (`y' <= y`), and for inputs in
/// [0, 1] stays strictly below 1.
///
/// # Example
///
/// ```rust
/// use cinehdr_tone::soft_knee;
///
/// assert_eq!(soft_knee(0.5, 0.97, 0.6), 0.5);
/// let compressed = soft_knee(0.99, 0.97, 0.6);
/// assert!(compressed < 0.99 && compressed > 0.97);
/// ```
#[inline]
pub fn soft_knee(y: f32, yknee: f32, alpha: f32) -> f32 {
    if y <= yknee {
        return y;
    }
    let max_excess = 1.0 - yknee;
    if max_excess <= 0.0 {
        return yknee;
    }
    let n = (y - yknee) / max_excess;
    yknee + max_excess * n / (1.0 + alpha * n)
}

/// Toe clamp: floors positive values at `toe`, leaves zero untouched.
///
/// Applying the floor only to `y > 0` preserves `f(0) = 0`.
///
/// # Example
///
/// ```rust
/// use cinehdr_tone::toe_clamp;
///
/// assert_eq!(toe_clamp(0.0, 0.002), 0.0);
/// assert_eq!(toe_clamp(0.0005, 0.002), 0.002);
/// assert_eq!(toe_clamp(0.5, 0.002), 0.5);
/// ```
#[inline]
pub fn toe_clamp(y: f32, toe: f32) -> f32 {
    if toe <= 0.0 || y <= 0.0 {
        return y;
    }
    y.max(toe)
}
