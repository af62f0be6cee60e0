//! 3x3 matrix type for color transformations.
//!
//! [`Mat3`] is used for gamut conversions (BT.2020 <-> P3-D65, BT.2020 <->
//! XYZ) and the OKLab LMS stages.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and multiply **column
//! vectors**:
//!
//! ```text
//! | m00 m01 m02 |   | r |   | m00*r + m01*g + m02*b |
//! | m10 m11 m12 | * | g | = | m10*r + m11*g + m12*b |
//! | m20 m21 m22 |   | b |   | m20*r + m21*g + m22*b |
//! ```
//!
//! Inverse matrices are shipped as literal constants alongside their
//! forward counterparts; nothing in the pipeline inverts a matrix at
//! runtime.

/// A 3x3 matrix for color transformations.
///
/// Stored in row-major order. Use [`Mat3::from_rows`] to construct from
/// component arrays.
///
/// # Example
///
/// ```rust
/// use cinehdr_math::Mat3;
///
/// let rgb = [0.25, 0.5, 0.75];
/// assert_eq!(Mat3::IDENTITY.transform(rgb), rgb);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// Matrix elements in row-major order: [row0, row1, row2]
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from row arrays.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cinehdr_math::Mat3;
    ///
    /// let m = Mat3::from_rows([
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    ///     [0.0, 0.0, 1.0],
    /// ]);
    /// assert_eq!(m, Mat3::IDENTITY);
    /// ```
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a diagonal matrix.
    #[inline]
    pub const fn from_diagonal(d: [f32; 3]) -> Self {
        Self {
            m: [
                [d[0], 0.0, 0.0],
                [0.0, d[1], 0.0],
                [0.0, 0.0, d[2]],
            ],
        }
    }

    /// Transforms an RGB triple: `M * v`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cinehdr_math::Mat3;
    ///
    /// let scale = Mat3::from_diagonal([2.0, 2.0, 2.0]);
    /// assert_eq!(scale.transform([1.0, 0.5, 0.25]), [2.0, 1.0, 0.5]);
    /// ```
    #[inline]
    pub fn transform(&self, v: [f32; 3]) -> [f32; 3] {
        [
            self.m[0][0] * v[0] + self.m[0][1] * v[1] + self.m[0][2] * v[2],
            self.m[1][0] * v[0] + self.m[1][1] * v[1] + self.m[1][2] * v[2],
            self.m[2][0] * v[0] + self.m[2][1] * v[1] + self.m[2][2] * v[2],
        ]
    }

    /// Matrix product `self * other`.
    ///
    /// Applying the result is equivalent to applying `other` first, then
    /// `self`.
    pub fn mul_mat(&self, other: &Mat3) -> Mat3 {
        let mut out = [[0.0f32; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        Mat3::from_rows(out)
    }

    /// Transposed copy.
    #[inline]
    pub const fn transpose(&self) -> Mat3 {
        Mat3::from_rows([
            [self.m[0][0], self.m[1][0], self.m[2][0]],
            [self.m[0][1], self.m[1][1], self.m[2][1]],
            [self.m[0][2], self.m[1][2], self.m[2][2]],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let v = [0.1, 0.2, 0.3];
        assert_eq!(Mat3::IDENTITY.transform(v), v);
    }

    #[test]
    fn test_diagonal() {
        let m = Mat3::from_diagonal([1.0, 2.0, 3.0]);
        assert_eq!(m.transform([1.0, 1.0, 1.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mul_mat_identity() {
        let m = Mat3::from_rows([
            [0.5, 0.1, 0.0],
            [0.2, 0.9, 0.1],
            [0.0, 0.3, 1.1],
        ]);
        let p = m.mul_mat(&Mat3::IDENTITY);
        assert_eq!(p, m);
    }

    #[test]
    fn test_mul_mat_order() {
        let scale = Mat3::from_diagonal([2.0, 2.0, 2.0]);
        let swap = Mat3::from_rows([
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        // scale-then-swap vs swap-then-scale agree here, but the product
        // must match applying `other` first.
        let combined = swap.mul_mat(&scale);
        let v = [1.0, 3.0, 5.0];
        let expected = swap.transform(scale.transform(v));
        assert_eq!(combined.transform(v), expected);
    }

    #[test]
    fn test_transpose() {
        let m = Mat3::from_rows([
            [1.0, 2.0, 3.0],
            [4.0, 5.0, 6.0],
            [7.0, 8.0, 9.0],
        ]);
        let t = m.transpose();
        assert_eq!(t.m[0], [1.0, 4.0, 7.0]);
        assert_eq!(t.transpose(), m);
    }
}
