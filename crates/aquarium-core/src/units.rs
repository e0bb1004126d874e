//! Length units: form values arrive in centimeters, the scene works in meters

use crate::dimensions::{Axis, DimensionError};

/// Centimeters per scene unit (meter)
pub const CM_PER_METER: f32 = 100.0;

/// Convert a centimeter value to meters. No validation; see [`PositiveLength`].
pub fn to_meters(value_cm: f32) -> f32 {
    value_cm / CM_PER_METER
}

/// A finite, strictly positive length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PositiveLength(f32);

impl PositiveLength {
    /// Validate a length already expressed in meters
    pub fn new(axis: Axis, meters: f32) -> Result<Self, DimensionError> {
        if !meters.is_finite() {
            return Err(DimensionError::NotFinite { axis, value: meters });
        }
        if meters <= 0.0 {
            return Err(DimensionError::NotPositive { axis, value: meters });
        }
        Ok(Self(meters))
    }

    /// Validate a centimeter form value and convert it to meters
    pub fn from_cm(axis: Axis, value_cm: f32) -> Result<Self, DimensionError> {
        if !value_cm.is_finite() {
            return Err(DimensionError::NotFinite { axis, value: value_cm });
        }
        // Tiny positive values can underflow to zero once converted
        let meters = to_meters(value_cm);
        if value_cm <= 0.0 || meters <= 0.0 {
            return Err(DimensionError::NotPositive { axis, value: value_cm });
        }
        Ok(Self(meters))
    }

    /// For compile-time constants known to be finite and positive
    pub(crate) const fn from_trusted(meters: f32) -> Self {
        Self(meters)
    }

    pub fn get(self) -> f32 {
        self.0
    }

    pub fn to_cm(self) -> f32 {
        self.0 * CM_PER_METER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_meters() {
        assert_eq!(to_meters(100.0), 1.0);
        assert_eq!(to_meters(60.0), 0.6);
        assert_eq!(to_meters(0.0), 0.0);
    }

    #[test]
    fn test_to_meters_is_passthrough_for_bad_input() {
        assert!(to_meters(f32::NAN).is_nan());
        assert_eq!(to_meters(-50.0), -0.5);
    }

    #[test]
    fn test_positive_length_from_cm() {
        let length = PositiveLength::from_cm(Axis::Width, 60.0).unwrap();
        assert!((length.get() - 0.6).abs() < 1e-6);
        assert!((length.to_cm() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_positive_length_rejects_invalid() {
        assert_eq!(
            PositiveLength::from_cm(Axis::Height, 0.0),
            Err(DimensionError::NotPositive { axis: Axis::Height, value: 0.0 })
        );
        assert_eq!(
            PositiveLength::from_cm(Axis::Depth, -3.0),
            Err(DimensionError::NotPositive { axis: Axis::Depth, value: -3.0 })
        );
        assert!(matches!(
            PositiveLength::from_cm(Axis::Width, f32::NAN),
            Err(DimensionError::NotFinite { axis: Axis::Width, .. })
        ));
        assert_eq!(
            PositiveLength::from_cm(Axis::Width, 1e-44),
            Err(DimensionError::NotPositive { axis: Axis::Width, value: 1e-44 })
        );
        assert!(matches!(
            PositiveLength::new(Axis::Width, f32::INFINITY),
            Err(DimensionError::NotFinite { .. })
        ));
    }
}
