//! `biocraft-spatial` – rigid-body math for the craft.
//!
//! Converts points between the craft's local frame and the anatomical
//! reference frame.
//!
//! # Modules
//!
//! - [`rotation`] – [`Rotation`][rotation::Rotation]: unit quaternion with
//!   Euler construction, matrix conversion, composition and inversion.
//! - [`transform`] – [`Transform`][transform::Transform]: rotation plus
//!   translation, point mapping and inversion, and the free functions
//!   [`transform_point`][transform::transform_point] and
//!   [`invert_transform`][transform::invert_transform].
//! - [`frames`] – [`FrameTree`][frames::FrameTree]: named frames related by
//!   transforms, looked up by composing the chain between them.
//! - [`matrix`] – fixed-size 3×3 and 4×4 matrices.

pub mod frames;
pub mod matrix;
pub mod rotation;
pub mod transform;

pub use frames::FrameTree;
pub use matrix::{Matrix3, Matrix4};
pub use rotation::Rotation;
pub use transform::{Transform, invert_transform, transform_point};
