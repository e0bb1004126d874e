//! Tank dimensions - raw centimeter input and validated metric dimensions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::units::PositiveLength;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DimensionError {
    #[error("{axis} must be a number, got {value}")]
    NotFinite { axis: Axis, value: f32 },
    #[error("{axis} must be greater than zero, got {value}")]
    NotPositive { axis: Axis, value: f32 },
}

impl DimensionError {
    pub fn axis(&self) -> Axis {
        match self {
            DimensionError::NotFinite { axis, .. } | DimensionError::NotPositive { axis, .. } => {
                *axis
            }
        }
    }
}

/// Tank axis, used to report which form field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
    Depth,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
            Axis::Depth => write!(f, "depth"),
        }
    }
}

/// Dimensions as typed into the form, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankDimensionsCm {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl TankDimensionsCm {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Validate every axis and convert to meters.
    /// Axes are checked in width, height, depth order; the first failure wins.
    pub fn to_meters(&self) -> Result<TankDimensions, DimensionError> {
        Ok(TankDimensions {
            width: PositiveLength::from_cm(Axis::Width, self.width)?,
            height: PositiveLength::from_cm(Axis::Height, self.height)?,
            depth: PositiveLength::from_cm(Axis::Depth, self.depth)?,
        })
    }
}

impl Default for TankDimensionsCm {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 40.0,
            depth: 30.0,
        }
    }
}

/// Validated tank dimensions in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankDimensions {
    width: PositiveLength,
    height: PositiveLength,
    depth: PositiveLength,
}

impl Default for TankDimensions {
    fn default() -> Self {
        Self {
            width: PositiveLength::from_trusted(0.6),
            height: PositiveLength::from_trusted(0.4),
            depth: PositiveLength::from_trusted(0.3),
        }
    }
}

impl TankDimensions {
    pub fn new(width: PositiveLength, height: PositiveLength, depth: PositiveLength) -> Self {
        Self { width, height, depth }
    }

    pub fn width(&self) -> f32 {
        self.width.get()
    }

    pub fn height(&self) -> f32 {
        self.height.get()
    }

    pub fn depth(&self) -> f32 {
        self.depth.get()
    }

    pub fn to_cm(&self) -> TankDimensionsCm {
        TankDimensionsCm {
            width: self.width.to_cm(),
            height: self.height.to_cm(),
            depth: self.depth.to_cm(),
        }
    }
}
