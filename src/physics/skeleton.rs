//! Per-frame skeleton view
//!
//! Wraps one frame's 33 keypoints and answers angle and velocity queries.
//! Every getter returns None when the landmarks it needs are missing or
//! below [`MIN_KEYPOINT_SCORE`](crate::pose::MIN_KEYPOINT_SCORE); callers
//! decide whether to substitute a neutral default.

use serde::{Deserialize, Serialize};

use nalgebra::Vector2;

use super::angles::{
    angle_between, distance, joint_angle, lean_from_vertical, midpoint, swing_from_hanging,
};
use crate::error::AnalysisError;
use crate::layout::{keypoint_bounds, CropRegion};
use crate::pose::{
    BodySide, Degrees, Keypoint, MetersPerSecond, Pixels, LANDMARK_COUNT, LEFT_ANKLE, LEFT_EAR,
    LEFT_HIP, LEFT_SHOULDER, NOSE, RIGHT_ANKLE, RIGHT_EAR, RIGHT_HIP, RIGHT_SHOULDER,
    VALUES_PER_LANDMARK,
};

/// Frame gaps above this (seconds) are treated as seeks, not motion
pub const MAX_VELOCITY_GAP_SECONDS: f64 = 0.5;

/// Immutable keypoint set for one frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skeleton {
    keypoints: Vec<Keypoint>,
}

impl Skeleton {
    /// Build from a keypoint list. Short lists are padded with missing
    /// points and anything past the 33rd entry is dropped.
    pub fn new(mut keypoints: Vec<Keypoint>) -> Self {
        keypoints.resize(LANDMARK_COUNT, Keypoint::missing());
        Self { keypoints }
    }

    /// Build from a flat `[x, y, score] × 33` buffer
    pub fn from_flat(data: &[f64]) -> Result<Self, AnalysisError> {
        let expected = LANDMARK_COUNT * VALUES_PER_LANDMARK;
        if data.len() != expected {
            return Err(AnalysisError::InvalidKeypointBuffer { len: data.len(), expected });
        }
        let keypoints = data
            .chunks_exact(VALUES_PER_LANDMARK)
            .map(|c| Keypoint::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { keypoints })
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// Fails on the first keypoint with a NaN or infinite field
    pub fn check_finite(&self) -> Result<(), AnalysisError> {
        match self.keypoints.iter().position(|k| !k.is_finite()) {
            Some(index) => Err(AnalysisError::NonFiniteKeypoint { index }),
            None => Ok(()),
        }
    }

    pub fn confident_count(&self) -> usize {
        self.keypoints.iter().filter(|k| k.is_usable()).count()
    }

    /// Position of a landmark, only if confident
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        self.keypoints
            .get(index)
            .filter(|k| k.is_usable())
            .map(Keypoint::position)
    }

    /// Midpoint of a bilateral pair, or whichever side is visible
    fn center_of(&self, left: usize, right: usize) -> Option<(f64, f64)> {
        match (self.point(left), self.point(right)) {
            (Some(l), Some(r)) => Some(midpoint(l, r)),
            (Some(p), None) | (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }

    /// Torso lean from vertical, hip center to shoulder center
    pub fn spine_angle(&self) -> Option<Degrees> {
        let hips = self.center_of(LEFT_HIP, RIGHT_HIP)?;
        let shoulders = self.center_of(LEFT_SHOULDER, RIGHT_SHOULDER)?;
        lean_from_vertical(hips, shoulders)
    }

    /// Shoulder-hip-knee angle; 180° when standing tall
    pub fn hip_angle(&self, side: BodySide) -> Option<Degrees> {
        joint_angle(
            self.point(side.shoulder())?,
            self.point(side.hip())?,
            self.point(side.knee())?,
        )
    }

    /// Hip-knee-ankle angle; 180° when the leg is straight
    pub fn knee_angle(&self, side: BodySide) -> Option<Degrees> {
        joint_angle(
            self.point(side.hip())?,
            self.point(side.knee())?,
            self.point(side.ankle())?,
        )
    }

    pub fn elbow_angle(&self, side: BodySide) -> Option<Degrees> {
        joint_angle(
            self.point(side.shoulder())?,
            self.point(side.elbow())?,
            self.point(side.wrist())?,
        )
    }

    /// Shoulder-to-wrist swing away from hanging straight down
    pub fn arm_vertical_angle(&self, side: BodySide) -> Option<Degrees> {
        swing_from_hanging(self.point(side.shoulder())?, self.point(side.wrist())?)
    }

    /// Angle between the arm (shoulder → wrist) and the torso (shoulder → hip)
    /// on the first side where all three landmarks are visible
    pub fn arm_to_spine_angle(&self, preferred: BodySide) -> Option<Degrees> {
        [preferred, preferred.other()].into_iter().find_map(|side| {
            let shoulder = self.point(side.shoulder())?;
            let wrist = self.point(side.wrist())?;
            let hip = self.point(side.hip())?;
            let arm = Vector2::new(wrist.0 - shoulder.0, wrist.1 - shoulder.1);
            let torso = Vector2::new(hip.0 - shoulder.0, hip.1 - shoulder.1);
            angle_between(arm, torso)
        })
    }

    /// Vertical arm swing on the preferred side, falling back to the other
    pub fn best_arm_vertical_angle(&self, preferred: BodySide) -> Option<Degrees> {
        self.arm_vertical_angle(preferred)
            .or_else(|| self.arm_vertical_angle(preferred.other()))
    }

    /// Knee angle on the preferred side, falling back to the other
    pub fn best_knee_angle(&self, preferred: BodySide) -> Option<Degrees> {
        self.knee_angle(preferred)
            .or_else(|| self.knee_angle(preferred.other()))
    }

    /// Mean Y of the confident ears
    pub fn ear_y_pixels(&self) -> Option<Pixels> {
        self.center_of(LEFT_EAR, RIGHT_EAR).map(|(_, y)| Pixels(y))
    }

    /// Union box of keypoints scoring at least `min_confidence`
    pub fn bounding_box(&self, min_confidence: f64) -> Option<CropRegion> {
        keypoint_bounds(&self.keypoints, min_confidence)
    }

    /// Head (nose, else ears) to lowest confident ankle
    pub fn pixel_height(&self) -> Option<Pixels> {
        let head = self.point(NOSE).or_else(|| self.center_of(LEFT_EAR, RIGHT_EAR))?;
        let ankle_y = [LEFT_ANKLE, RIGHT_ANKLE]
            .into_iter()
            .filter_map(|i| self.point(i))
            .map(|(_, y)| y)
            .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))))?;
        let height = ankle_y - head.1;
        if height > 0.0 {
            Some(Pixels(height))
        } else {
            None
        }
    }

    /// Real-world wrist speed relative to `prev`
    ///
    /// Pixel displacement is converted to meters by mapping the mean
    /// head-to-ankle pixel height of the two frames onto `user_height_cm`.
    /// None when `elapsed_s` is outside (0, 0.5], when neither wrist is
    /// visible in both frames, or when calibration landmarks are missing.
    pub fn velocity(
        &self,
        prev: &Skeleton,
        elapsed_s: f64,
        user_height_cm: f64,
        preferred: BodySide,
    ) -> Option<MetersPerSecond> {
        if !(elapsed_s > 0.0 && elapsed_s <= MAX_VELOCITY_GAP_SECONDS) {
            return None;
        }
        if !(user_height_cm > 0.0) {
            return None;
        }

        let (now, before) = [preferred, preferred.other()].into_iter().find_map(|side| {
            Some((self.point(side.wrist())?, prev.point(side.wrist())?))
        })?;

        let pixel_height = (self.pixel_height()?.value() + prev.pixel_height()?.value()) / 2.0;
        let meters_per_pixel = (user_height_cm / 100.0) / pixel_height;

        let displacement_m = distance(before, now) * meters_per_pixel;
        Some(MetersPerSecond(displacement_m / elapsed_s))
    }
}
