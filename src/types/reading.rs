//! Triaxial accelerometer reading types

use serde::{Deserialize, Serialize};

/// One timestamped triaxial acceleration sample.
///
/// `timestamp` is the sensor clock in milliseconds. It may be fractional on
/// input; resampled readings always sit on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: f64,
    /// Acceleration on the X axis (sensor native units)
    pub x: f64,
    /// Acceleration on the Y axis (sensor native units)
    pub y: f64,
    /// Acceleration on the Z axis (sensor native units)
    pub z: f64,
}

impl Reading {
    pub const fn new(timestamp: f64, x: f64, y: f64, z: f64) -> Self {
        Self { timestamp, x, y, z }
    }

    /// Value of a single axis.
    pub const fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Readings from one sensor, ordered by timestamp once resampled.
pub type Stream = Vec<Reading>;

/// Accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in output order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// Project one axis out of a stream.
pub fn axis_values(stream: &[Reading], axis: Axis) -> Vec<f64> {
    stream.iter().map(|r| r.axis(axis)).collect()
}
