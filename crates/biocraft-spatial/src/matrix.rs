//! Fixed-size row-major matrices used by [`Rotation`][crate::rotation::Rotation]
//! and [`Transform`][crate::transform::Transform].

use std::ops::Mul;

use biocraft_types::Vec3;

/// A 3×3 row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    pub rows: [[f64; 3]; 3],
}

impl Matrix3 {
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.rows;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// `self · v`
    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        let m = &self.rows;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Element-wise comparison within an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        Matrix3::from_rows(out)
    }
}

impl Mul<Vec3> for Matrix3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.mul_vec(v)
    }
}

/// A 4×4 row-major homogeneous transform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    pub rows: [[f64; 4]; 4],
}

impl Matrix4 {
    pub const fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Embed `rotation` in the upper-left block and `translation` in the last
    /// column.  The bottom row is `(0, 0, 0, 1)`.
    pub fn from_parts(rotation: &Matrix3, translation: Vec3) -> Self {
        let mut out = Self::identity();
        for (r, row) in rotation.rows.iter().enumerate() {
            out.rows[r][..3].copy_from_slice(row);
        }
        out.rows[0][3] = translation.x;
        out.rows[1][3] = translation.y;
        out.rows[2][3] = translation.z;
        out
    }

    /// The upper-left 3×3 block.
    pub fn rotation_block(&self) -> Matrix3 {
        let m = &self.rows;
        Matrix3::from_rows([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// The translation column.
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }

    /// Apply to `p` as the homogeneous point `(p, 1)`.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation_block().mul_vec(p) + self.translation()
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        Matrix4 { rows: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_times_vector_is_noop() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(Matrix3::identity() * v, v);
    }

    #[test]
    fn transpose_swaps_off_diagonal() {
        let m = Matrix3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let t = m.transpose();
        assert_eq!(t.rows[0][1], 4.0);
        assert_eq!(t.rows[2][0], 3.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn determinant_of_permutation_is_signed() {
        let swap_xy = Matrix3::from_rows([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(swap_xy.determinant(), -1.0);
        assert_eq!(Matrix3::identity().determinant(), 1.0);
    }

    #[test]
    fn homogeneous_matrix_layout() {
        let m = Matrix4::from_parts(&Matrix3::identity(), Vec3::new(10.0, -5.0, 2.0));
        assert_eq!(m.rows[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.translation(), Vec3::new(10.0, -5.0, 2.0));
        assert_eq!(
            m.transform_point(Vec3::new(1.0, 1.0, 1.0)),
            Vec3::new(11.0, -4.0, 3.0)
        );
    }

    #[test]
    fn matrix4_product_composes_translations() {
        let a = Matrix4::from_parts(&Matrix3::identity(), Vec3::new(1.0, 0.0, 0.0));
        let b = Matrix4::from_parts(&Matrix3::identity(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!((a * b).translation(), Vec3::new(1.0, 2.0, 0.0));
    }
}
