//! [`SafetyConfig`] – fixed parameters of a [`SafetyLayer`][crate::SafetyLayer].
//!
//! Serializes to the `[safety]` table of the CLI's TOML config:
//!
//! ```toml
//! translational_limits_mm = [[-500.0, 500.0], [-500.0, 500.0], [-500.0, 500.0]]
//! rotational_limits_deg = [[-90.0, 90.0], [-90.0, 90.0], [-180.0, 180.0]]
//! rate_interval_s = 0.01
//! confirmation_timeout_s = 30.0
//! risk_threshold = "high"
//! ```
//!
//! Missing keys fall back to the defaults shown above.

use std::time::Duration;

use biocraft_types::{Axis, AxisBounds, CraftError, Quantity, RiskLevel};
use serde::{Deserialize, Serialize};

/// Travel limits, pacing and confirmation policy for command admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Per-axis translation bounds, millimeters.
    #[serde(default = "default_translational_limits")]
    pub translational_limits_mm: [AxisBounds; 3],

    /// Per-axis (roll, pitch, yaw) bounds, degrees.
    #[serde(default = "default_rotational_limits")]
    pub rotational_limits_deg: [AxisBounds; 3],

    /// Minimum time between accepted commands.
    #[serde(rename = "rate_interval_s", with = "seconds", default = "default_rate_interval")]
    pub rate_interval: Duration,

    /// How long a high-risk command may wait for an operator.
    #[serde(
        rename = "confirmation_timeout_s",
        with = "seconds",
        default = "default_confirmation_timeout"
    )]
    pub confirmation_timeout: Duration,

    /// Commands at or above this level need human confirmation.
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: RiskLevel,
}

fn default_translational_limits() -> [AxisBounds; 3] {
    [AxisBounds::symmetric(500.0); 3]
}
fn default_rotational_limits() -> [AxisBounds; 3] {
    [
        AxisBounds::symmetric(90.0),
        AxisBounds::symmetric(90.0),
        AxisBounds::symmetric(180.0),
    ]
}
fn default_rate_interval() -> Duration {
    Duration::from_millis(10)
}
fn default_confirmation_timeout() -> Duration {
    Duration::from_secs(30)
}
fn default_risk_threshold() -> RiskLevel {
    RiskLevel::High
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            translational_limits_mm: default_translational_limits(),
            rotational_limits_deg: default_rotational_limits(),
            rate_interval: default_rate_interval(),
            confirmation_timeout: default_confirmation_timeout(),
            risk_threshold: default_risk_threshold(),
        }
    }
}

impl SafetyConfig {
    /// Reject bounds that are non-finite or inverted and zero durations.
    ///
    /// # Errors
    ///
    /// [`CraftError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CraftError> {
        let limit_sets = [
            (Quantity::Translation, &self.translational_limits_mm),
            (Quantity::Rotation, &self.rotational_limits_deg),
        ];
        for (quantity, limits) in limit_sets {
            for (axis, bound) in Axis::ALL.into_iter().zip(limits) {
                if !bound.min.is_finite() || !bound.max.is_finite() {
                    return Err(CraftError::InvalidConfig(format!(
                        "{quantity} {axis} bound {bound} is not finite"
                    )));
                }
                if bound.min > bound.max {
                    return Err(CraftError::InvalidConfig(format!(
                        "{quantity} {axis} bound {bound} has min > max"
                    )));
                }
            }
        }
        if self.rate_interval.is_zero() {
            return Err(CraftError::InvalidConfig(
                "rate_interval_s must be greater than zero".to_string(),
            ));
        }
        if self.confirmation_timeout.is_zero() {
            return Err(CraftError::InvalidConfig(
                "confirmation_timeout_s must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// `Duration` as fractional seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}
