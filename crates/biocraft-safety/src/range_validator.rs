//! [`RangeValidator`] – per-axis travel limits.
//!
//! Checks the three components of a command vector against inclusive
//! `[min, max]` bounds.  The first violated axis (in X, Y, Z order) is
//! reported as [`CraftError::OutOfRange`].

use biocraft_types::{Axis, AxisBounds, CraftError, Quantity, Vec3};

/// Inclusive per-axis bounds for one [`Quantity`] of a command.
///
/// # Example
///
/// ```
/// use biocraft_safety::range_validator::RangeValidator;
/// use biocraft_types::{AxisBounds, Quantity, Vec3};
///
/// let v = RangeValidator::new(Quantity::Translation, [AxisBounds::symmetric(500.0); 3]);
/// assert!(v.validate(Vec3::new(10.0, -200.0, -50.0)).is_ok());
/// assert!(v.validate(Vec3::new(10.0, -200.0, 501.0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeValidator {
    quantity: Quantity,
    bounds: [AxisBounds; 3],
}

impl RangeValidator {
    pub fn new(quantity: Quantity, bounds: [AxisBounds; 3]) -> Self {
        Self { quantity, bounds }
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn bounds(&self) -> &[AxisBounds; 3] {
        &self.bounds
    }

    pub fn validate(&self, vector: Vec3) -> Result<(), CraftError> {
        validate(self.quantity, vector, &self.bounds)
    }
}

/// Fail with [`CraftError::OutOfRange`] if any component of `vector` lies
/// outside its bound.  Bounds are inclusive and NaN components always fail.
pub fn validate(
    quantity: Quantity,
    vector: Vec3,
    bounds: &[AxisBounds; 3],
) -> Result<(), CraftError> {
    for (axis, bound) in Axis::ALL.into_iter().zip(bounds) {
        let value = vector.component(axis);
        if !bound.contains(value) {
            return Err(CraftError::OutOfRange {
                quantity,
                axis,
                value,
                bound: *bound,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rotation_validator() -> RangeValidator {
        RangeValidator::new(
            Quantity::Rotation,
            [
                AxisBounds::new(-90.0, 90.0),
                AxisBounds::new(-90.0, 90.0),
                AxisBounds::new(-180.0, 180.0),
            ],
        )
    }

    #[test]
    fn within_bounds_passes() {
        assert!(rotation_validator().validate(Vec3::new(0.0, 0.0, 45.0)).is_ok());
    }

    #[test]
    fn exact_min_and_max_pass() {
        let v = rotation_validator();
        assert!(v.validate(Vec3::new(-90.0, 90.0, -180.0)).is_ok());
        assert!(v.validate(Vec3::new(90.0, -90.0, 180.0)).is_ok());
    }

    #[test]
    fn just_over_max_rejected() {
        let result = rotation_validator().validate(Vec3::new(0.0, 0.0, 180.0 + EPS));
        assert!(matches!(
            result,
            Err(CraftError::OutOfRange { axis: Axis::Z, quantity: Quantity::Rotation, .. })
        ));
    }

    #[test]
    fn just_under_min_rejected() {
        let result = rotation_validator().validate(Vec3::new(-90.0 - EPS, 0.0, 0.0));
        assert!(matches!(result, Err(CraftError::OutOfRange { axis: Axis::X, .. })));
    }

    #[test]
    fn error_reports_value_and_violated_bound() {
        let err = rotation_validator()
            .validate(Vec3::new(0.0, 120.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            CraftError::OutOfRange {
                quantity: Quantity::Rotation,
                axis: Axis::Y,
                value: 120.0,
                bound: AxisBounds::new(-90.0, 90.0),
            }
        );
    }

    #[test]
    fn first_failing_axis_short_circuits() {
        let result = rotation_validator().validate(Vec3::new(500.0, 500.0, 500.0));
        assert!(matches!(result, Err(CraftError::OutOfRange { axis: Axis::X, .. })));
    }

    #[test]
    fn nan_component_rejected() {
        let result = rotation_validator().validate(Vec3::new(0.0, f64::NAN, 0.0));
        assert!(matches!(result, Err(CraftError::OutOfRange { axis: Axis::Y, .. })));
    }

    #[test]
    fn infinite_component_rejected() {
        let result = validate(
            Quantity::Translation,
            Vec3::new(f64::NEG_INFINITY, 0.0, 0.0),
            &[AxisBounds::symmetric(500.0); 3],
        );
        assert!(matches!(result, Err(CraftError::OutOfRange { .. })));
    }

    #[test]
    fn degenerate_bound_admits_only_its_value() {
        let bounds = [
            AxisBounds::new(0.0, 0.0),
            AxisBounds::symmetric(1.0),
            AxisBounds::symmetric(1.0),
        ];
        assert!(validate(Quantity::Translation, Vec3::zero(), &bounds).is_ok());
        assert!(validate(Quantity::Translation, Vec3::new(EPS, 0.0, 0.0), &bounds).is_err());
    }
}
