//! Unit-quaternion [`Rotation`].
//!
//! Quaternions use the `(w, x, y, z)` Hamilton convention and represent
//! active rotations: [`Rotation::to_rotation_matrix`] returns the matrix `R`
//! that maps a local vector `v` to `R·v`.  Composition matches matrix
//! multiplication, so `a.compose(b)` rotates by `b` first and then by `a`.
//!
//! Every constructor normalizes its result and refuses non-finite or
//! zero-norm input, so a `Rotation` value always has unit norm.
//!
//! # Example
//!
//! ```rust
//! use biocraft_spatial::rotation::Rotation;
//! use biocraft_types::{AngleUnit, Vec3};
//!
//! let yaw = Rotation::from_euler(0.0, 0.0, 90.0, AngleUnit::Degrees).unwrap();
//! let v = yaw.rotate_vector(Vec3::new(1.0, 0.0, 0.0));
//! assert!(v.approx_eq(Vec3::new(0.0, 1.0, 0.0), 1e-9));
//! ```

use biocraft_types::{AngleUnit, Axis, CraftError, Vec3};

use crate::matrix::Matrix3;

/// Maximum deviation of `|q|` from 1 tolerated on any stored rotation.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// A unit quaternion representing a 3-D orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation {
    /// The zero-angle rotation `(1, 0, 0, 0)`.
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Build a rotation from raw components, normalizing them.
    ///
    /// # Errors
    ///
    /// [`CraftError::DegenerateRotation`] when the norm is zero or any
    /// component is non-finite.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Result<Self, CraftError> {
        let norm = (w * w + x * x + y * y + z * z).sqrt();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Err(CraftError::DegenerateRotation { norm });
        }
        Ok(Self {
            w: w / norm,
            x: x / norm,
            y: y / norm,
            z: z / norm,
        })
    }

    /// Rotation of `angle` about `axis` (right-hand rule).
    ///
    /// # Errors
    ///
    /// - [`CraftError::InvalidAngle`] – `angle` is non-finite.
    /// - [`CraftError::DegenerateRotation`] – `axis` is zero or non-finite.
    pub fn from_axis_angle(axis: Vec3, angle: f64, unit: AngleUnit) -> Result<Self, CraftError> {
        check_finite("angle", angle)?;
        let norm = axis.norm();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Err(CraftError::DegenerateRotation { norm });
        }
        let half = unit.to_radians(angle) * 0.5;
        let s = half.sin() / norm;
        Self::new(half.cos(), axis.x * s, axis.y * s, axis.z * s)
    }

    /// Build a rotation from roll (about X), pitch (about Y) and yaw (about Z).
    ///
    /// The result is `yaw ∘ pitch ∘ roll`: intrinsic Z-Y'-X'' about the body
    /// axes, which is the same as rolling about the fixed X axis first, then
    /// pitching about fixed Y, then yawing about fixed Z.
    ///
    /// # Errors
    ///
    /// [`CraftError::InvalidAngle`] if any input is NaN or infinite.
    pub fn from_euler(
        roll: f64,
        pitch: f64,
        yaw: f64,
        unit: AngleUnit,
    ) -> Result<Self, CraftError> {
        check_finite("roll", roll)?;
        check_finite("pitch", pitch)?;
        check_finite("yaw", yaw)?;

        let q_roll = Self::about(Axis::X, unit.to_radians(roll));
        let q_pitch = Self::about(Axis::Y, unit.to_radians(pitch));
        let q_yaw = Self::about(Axis::Z, unit.to_radians(yaw));
        Ok(q_yaw.compose(q_pitch).compose(q_roll))
    }

    /// Single-axis rotation; always unit norm for finite `radians`.
    fn about(axis: Axis, radians: f64) -> Self {
        let (s, c) = (radians * 0.5).sin_cos();
        match axis {
            Axis::X => Self {
                w: c,
                x: s,
                y: 0.0,
                z: 0.0,
            },
            Axis::Y => Self {
                w: c,
                x: 0.0,
                y: s,
                z: 0.0,
            },
            Axis::Z => Self {
                w: c,
                x: 0.0,
                y: 0.0,
                z: s,
            },
        }
    }

    /// Components as `[w, x, y, z]`.
    pub fn components(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    pub fn norm(&self) -> f64 {
        self.components().iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// The orthonormal rotation matrix `R` with `R·v` == `self.rotate_vector(v)`.
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        let Self { w, x, y, z } = *self;
        Matrix3::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }

    /// Hamilton product `self ⊗ other`: rotate by `other`, then by `self`.
    ///
    /// The product is renormalized to remove floating-point drift.
    pub fn compose(self, other: Self) -> Self {
        let (a, b) = (self, other);
        let w = a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z;
        let x = a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y;
        let y = a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x;
        let z = a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w;
        // |a ⊗ b| = |a|·|b|, which is 1 up to rounding for unit inputs.
        let norm = (w * w + x * x + y * y + z * z).sqrt();
        Self {
            w: w / norm,
            x: x / norm,
            y: y / norm,
            z: z / norm,
        }
    }

    /// Conjugate divided by the squared norm.
    pub fn inverse(self) -> Self {
        let n2 = self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z;
        Self {
            w: self.w / n2,
            x: -self.x / n2,
            y: -self.y / n2,
            z: -self.z / n2,
        }
    }

    /// Rotate `v`: equivalent to `q · (0, v) · q*`.
    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Recover `(roll, pitch, yaw)` as consumed by [`Rotation::from_euler`].
    ///
    /// Pitch is confined to `[-90°, 90°]`; at exactly ±90° roll and yaw are
    /// not separable and the split between them is arbitrary.
    pub fn to_euler(&self, unit: AngleUnit) -> Vec3 {
        let Self { w, x, y, z } = *self;
        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
        Vec3::new(
            unit.convert_radians(roll),
            unit.convert_radians(pitch),
            unit.convert_radians(yaw),
        )
    }

    /// Geodesic angle between the two orientations, in radians, in `[0, π]`.
    pub fn angle_to(&self, other: &Self) -> f64 {
        let dot = self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z;
        2.0 * dot.abs().min(1.0).acos()
    }

    /// Component-wise comparison that treats `q` and `-q` as equal.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        let a = self.components();
        let b = other.components();
        let same = a.iter().zip(&b).all(|(p, q)| (p - q).abs() <= tol);
        let flipped = a.iter().zip(&b).all(|(p, q)| (p + q).abs() <= tol);
        same || flipped
    }
}

fn check_finite(component: &str, value: f64) -> Result<(), CraftError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CraftError::InvalidAngle {
            component: component.to_string(),
            value,
        })
    }
}
