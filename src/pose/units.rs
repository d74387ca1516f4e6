//! Unit-tagged scalars
//!
//! Pixel coordinates, normalized coordinates, angles, speeds and depth
//! percentages are all `f64` underneath. Wrapping them keeps a pixel Y from
//! being fed where a normalized Y is expected. There is no implicit
//! conversion between them; go through the named constructors.

use serde::{Deserialize, Serialize};

/// Source-video pixel distance or coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pixels(pub f64);

/// Coordinate as a fraction of a frame dimension (0 = top/left, 1 = bottom/right)
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Normalized(pub f64);

/// Angle in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Real-world speed in meters per second
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecond(pub f64);

/// Squat depth, 0 (standing tall) to 100 (deepest tracked)
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthPercent(pub f64);

impl Pixels {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Express this pixel coordinate as a fraction of `extent`.
    ///
    /// Returns None for a non-positive extent.
    pub fn normalize(self, extent: Pixels) -> Option<Normalized> {
        if extent.0 > 0.0 {
            Some(Normalized(self.0 / extent.0))
        } else {
            None
        }
    }
}

impl Normalized {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Degrees {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn from_radians(radians: f64) -> Self {
        Degrees(radians.to_degrees())
    }
}

impl MetersPerSecond {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl DepthPercent {
    pub fn value(self) -> f64 {
        self.0
    }
}
