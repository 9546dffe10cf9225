//! `biocraft-types` – value types shared by the spatial and safety crates.
//!
//! Lengths are millimeters in RAS anatomical coordinates (+X right,
//! +Y anterior, +Z superior).  Externally facing angles are degrees.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Geometry primitives
// ────────────────────────────────────────────────────────────────────────────

/// A 3-component vector: a point, a translation, or a triple of Euler angles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Value of the component along `axis`.
    pub fn component(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// `true` when every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise comparison within an absolute tolerance.
    pub fn approx_eq(self, other: Self, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && (self.z - other.z).abs() <= tol
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

/// One of the three Cartesian axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in `x, y, z` order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Unit of an angle argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert `value`, expressed in this unit, to radians.
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value.to_radians(),
            AngleUnit::Radians => value,
        }
    }

    /// Convert `radians` into this unit.
    pub fn convert_radians(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Degrees => radians.to_degrees(),
            AngleUnit::Radians => radians,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Safety primitives
// ────────────────────────────────────────────────────────────────────────────

/// Inclusive `[min, max]` travel bound for a single axis.
///
/// Serialized as a two-element array so configuration files read
/// `[[-500.0, 500.0], ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric bound `[-limit, limit]`.
    pub const fn symmetric(limit: f64) -> Self {
        Self::new(-limit, limit)
    }

    /// `true` when `min <= value <= max`.  NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl From<[f64; 2]> for AxisBounds {
    fn from([min, max]: [f64; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<AxisBounds> for [f64; 2] {
    fn from(b: AxisBounds) -> Self {
        [b.min, b.max]
    }
}

impl fmt::Display for AxisBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Which part of a command a range check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    /// Translation, millimeters.
    Translation,
    /// Euler rotation, degrees.
    Rotation,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Translation => write!(f, "translation"),
            Quantity::Rotation => write!(f, "rotation"),
        }
    }
}

/// Caller-supplied risk classification of a command.
///
/// Ordered from least to most risky; a command at or above the configured
/// threshold requires human confirmation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Elevated,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Elevated => write!(f, "elevated"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "elevated" => Ok(RiskLevel::Elevated),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(CraftError::InvalidConfig(format!(
                "unknown risk level {other:?}"
            ))),
        }
    }
}

/// Handle for a command awaiting human confirmation.
///
/// `deadline` is on the same monotonic timeline as the `now` arguments of the
/// safety API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfirmationHandle {
    pub command_id: Uuid,
    pub deadline: Duration,
}

/// Non-rejected outcome of command admission.
///
/// Only [`Admission::Accepted`] may be forwarded to an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum Admission {
    Accepted { command_id: Uuid },
    /// Neither accepted nor rejected yet; must not be actuated.
    PendingConfirmation { handle: ConfirmationHandle },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted { .. })
    }

    pub fn command_id(&self) -> Uuid {
        match self {
            Admission::Accepted { command_id } => *command_id,
            Admission::PendingConfirmation { handle } => handle.command_id,
        }
    }
}

/// Why a pending command ended up rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnconfirmedReason {
    Denied,
    TimedOut,
}

impl fmt::Display for UnconfirmedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnconfirmedReason::Denied => write!(f, "denied by operator"),
            UnconfirmedReason::TimedOut => write!(f, "confirmation timed out"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Every way a rotation construction or a command admission can fail.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CraftError {
    #[error("Invalid angle: {component} = {value}")]
    InvalidAngle { component: String, value: f64 },

    #[error("Degenerate rotation: quaternion norm {norm}")]
    DegenerateRotation { norm: f64 },

    #[error("Out of range: {quantity} {axis} = {value} outside {bound}")]
    OutOfRange {
        quantity: Quantity,
        axis: Axis,
        value: f64,
        bound: AxisBounds,
    },

    #[error("Rate limited: retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Command {command_id} unconfirmed: {reason}")]
    Unconfirmed {
        command_id: Uuid,
        reason: UnconfirmedReason,
    },

    #[error("Unknown or expired confirmation: {0}")]
    UnknownOrExpiredConfirmation(Uuid),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn vec3_component_by_axis() {
        let v = Vec3::new(10.0, -200.0, -50.0);
        assert_eq!(v.component(Axis::X), 10.0);
        assert_eq!(v.component(Axis::Y), -200.0);
        assert_eq!(v.component(Axis::Z), -50.0);
    }

    #[test]
    fn bounds_are_inclusive_and_reject_nan() {
        let b = AxisBounds::new(-90.0, 90.0);
        assert!(b.contains(-90.0));
        assert!(b.contains(90.0));
        assert!(!b.contains(90.000_001));
        assert!(!b.contains(f64::NAN));
    }

    #[test]
    fn bounds_serialize_as_pair() {
        let json = serde_json::to_string(&AxisBounds::new(-500.0, 500.0)).unwrap();
        assert_eq!(json, "[-500.0,500.0]");
        let back: AxisBounds = serde_json::from_str("[-1.5, 2.5]").unwrap();
        assert_eq!(back, AxisBounds::new(-1.5, 2.5));
    }

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Elevated);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn degrees_convert_to_radians() {
        let r = AngleUnit::Degrees.to_radians(180.0);
        assert!((r - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(AngleUnit::Radians.to_radians(1.25), 1.25);
    }

    #[test]
    fn admission_roundtrip() {
        let admission = Admission::PendingConfirmation {
            handle: ConfirmationHandle {
                command_id: Uuid::new_v4(),
                deadline: Duration::from_secs(30),
            },
        };
        let json = serde_json::to_string(&admission).unwrap();
        assert!(json.contains("PendingConfirmation"));
        let back: Admission = serde_json::from_str(&json).unwrap();
        assert_eq!(admission, back);
        assert!(!back.is_accepted());
    }

    #[test]
    fn craft_error_display() {
        let err = CraftError::OutOfRange {
            quantity: Quantity::Translation,
            axis: Axis::Y,
            value: -600.0,
            bound: AxisBounds::symmetric(500.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("translation y"));
        assert!(msg.contains("[-500, 500]"));

        let err2 = CraftError::Unconfirmed {
            command_id: Uuid::nil(),
            reason: UnconfirmedReason::TimedOut,
        };
        assert!(err2.to_string().contains("timed out"));
    }

    #[test]
    fn craft_error_roundtrip() {
        let err = CraftError::RateLimited {
            retry_after: Duration::from_millis(5),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: CraftError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
