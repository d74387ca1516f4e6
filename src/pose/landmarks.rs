//! Body landmark layout and per-frame keypoints
//!
//! The pose model reports 33 landmarks per frame in a fixed order. Indices
//! below follow that order; only the ones the analyzers read are named.

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (33-point body model)
// ============================================================================

pub const NOSE: usize = 0;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Total landmarks per frame
pub const LANDMARK_COUNT: usize = 33;

/// Values per landmark in a flat buffer: x, y, score
pub const VALUES_PER_LANDMARK: usize = 3;

/// Minimum score for a landmark to feed angle and velocity math
pub const MIN_KEYPOINT_SCORE: f64 = 0.5;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One tracked landmark in source-video pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    /// Model confidence in [0, 1]
    pub score: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, score: f64) -> Self {
        Self { x, y, score }
    }

    /// Keypoint that no consumer will ever trust
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn is_usable(&self) -> bool {
        self.score >= MIN_KEYPOINT_SCORE
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.score.is_finite()
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Which side of the body a bilateral landmark belongs to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    Left,
    #[default]
    Right,
}

impl BodySide {
    pub fn other(self) -> Self {
        match self {
            BodySide::Left => BodySide::Right,
            BodySide::Right => BodySide::Left,
        }
    }

    pub fn shoulder(self) -> usize {
        match self {
            BodySide::Left => LEFT_SHOULDER,
            BodySide::Right => RIGHT_SHOULDER,
        }
    }

    pub fn elbow(self) -> usize {
        match self {
            BodySide::Left => LEFT_ELBOW,
            BodySide::Right => RIGHT_ELBOW,
        }
    }

    pub fn wrist(self) -> usize {
        match self {
            BodySide::Left => LEFT_WRIST,
            BodySide::Right => RIGHT_WRIST,
        }
    }

    pub fn hip(self) -> usize {
        match self {
            BodySide::Left => LEFT_HIP,
            BodySide::Right => RIGHT_HIP,
        }
    }

    pub fn knee(self) -> usize {
        match self {
            BodySide::Left => LEFT_KNEE,
            BodySide::Right => RIGHT_KNEE,
        }
    }

    pub fn ankle(self) -> usize {
        match self {
            BodySide::Left => LEFT_ANKLE,
            BodySide::Right => RIGHT_ANKLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_indices_are_mirrored() {
        assert_eq!(BodySide::Left.wrist(), LEFT_WRIST);
        assert_eq!(BodySide::Right.wrist(), RIGHT_WRIST);
        assert_eq!(BodySide::Left.other(), BodySide::Right);
    }

    #[test]
    fn test_usable_threshold() {
        assert!(Keypoint::new(1.0, 2.0, MIN_KEYPOINT_SCORE).is_usable());
        assert!(!Keypoint::new(1.0, 2.0, 0.49).is_usable());
        assert!(!Keypoint::missing().is_usable());
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BodySide::Left).unwrap(), "\"left\"");
    }
}
