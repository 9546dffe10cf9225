//! Rigid-body [`Transform`]: rotation followed by translation.
//!
//! A `Transform` is the pose of a local frame within a reference frame.  To
//! express a local point in the reference frame, rotate it by `rotation` and
//! add `translation` (millimeters).
//!
//! # Example
//!
//! ```rust
//! use biocraft_spatial::transform::Transform;
//! use biocraft_types::Vec3;
//!
//! let yaw_45 = Vec3::new(0.0, 0.0, 45.0);
//! let tf = Transform::from_euler_deg(Vec3::new(10.0, -5.0, 2.0), yaw_45).unwrap();
//! let p = Vec3::new(0.0, -200.0, -50.0);
//! let back = tf.inverse().transform_point(tf.transform_point(p));
//! assert!(back.approx_eq(p, 1e-9));
//! ```

use biocraft_types::{AngleUnit, CraftError, Vec3};

use crate::matrix::{Matrix3, Matrix4};
use crate::rotation::Rotation;

/// Pose of a local frame within a reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub rotation: Rotation,
    /// Millimeters, expressed in the reference frame.
    pub translation: Vec3,
}

impl Transform {
    pub fn new(rotation: Rotation, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// No rotation, no translation.
    pub fn identity() -> Self {
        Self::new(Rotation::identity(), Vec3::zero())
    }

    /// Build a transform from a translation and `(roll, pitch, yaw)` in degrees.
    pub fn from_euler_deg(translation: Vec3, euler_deg: Vec3) -> Result<Self, CraftError> {
        let rotation =
            Rotation::from_euler(euler_deg.x, euler_deg.y, euler_deg.z, AngleUnit::Degrees)?;
        Ok(Self::new(rotation, translation))
    }

    /// 4×4 homogeneous matrix `[R t; 0 1]`.
    pub fn as_matrix(&self) -> Matrix4 {
        Matrix4::from_parts(&self.rotation.to_rotation_matrix(), self.translation)
    }

    /// `R·p + t`
    pub fn transform_point(&self, p_local: Vec3) -> Vec3 {
        self.rotation.to_rotation_matrix() * p_local + self.translation
    }

    /// `R·v`; directions ignore the translation.
    pub fn transform_vector(&self, v_local: Vec3) -> Vec3 {
        self.rotation.rotate_vector(v_local)
    }

    /// The inverse pose: rotation `R⁻¹` and translation `-Rᵀ·t`.
    pub fn inverse(&self) -> Self {
        let r_inv = self.rotation.to_rotation_matrix().transpose();
        Self::new(self.rotation.inverse(), -(r_inv * self.translation))
    }

    /// Chain two poses.
    ///
    /// If `self` = T_A_B and `other` = T_B_C, the result is T_A_C.
    pub fn compose(&self, other: &Self) -> Self {
        Self::new(
            self.rotation.compose(other.rotation),
            self.transform_point(other.translation),
        )
    }
}

/// Map `p_local` through `transform` into the reference frame.
pub fn transform_point(p_local: Vec3, transform: &Transform) -> Vec3 {
    transform.transform_point(p_local)
}

/// Inverse of `transform` as a raw `(R⁻¹, t⁻¹)` pair, computed from the
/// rotation matrix alone.
///
/// Agrees with `transform.inverse().as_matrix()`.
pub fn invert_transform(transform: &Transform) -> (Matrix3, Vec3) {
    let r_inv = transform.rotation.to_rotation_matrix().transpose();
    let t_inv = -(r_inv * transform.translation);
    (r_inv, t_inv)
}
