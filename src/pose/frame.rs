//! Pose-track frame record
//!
//! The shape exchanged with the pose-track cache. Field names are camelCase
//! on the wire.

use serde::{Deserialize, Serialize};

use super::landmarks::Keypoint;

/// Angles cached alongside a frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAngles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spine_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm_vertical_angle: Option<f64>,
    /// Smoothed wrist speed in m/s, written once by the speed pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrist_speed: Option<f64>,
}

/// One extracted frame of a pose track
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseTrackFrame {
    pub frame_index: u32,
    /// Capture timestamp in milliseconds
    pub timestamp: f64,
    /// Position in the source video in seconds
    pub video_time: f64,
    pub keypoints: Vec<Keypoint>,
    /// Overall pose confidence for the frame
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<FrameAngles>,
}

impl PoseTrackFrame {
    pub fn wrist_speed(&self) -> Option<f64> {
        self.angles.as_ref().and_then(|a| a.wrist_speed)
    }

    /// Seconds elapsed since `prev`, preferring video time over capture time.
    pub fn seconds_since(&self, prev: &PoseTrackFrame) -> f64 {
        let by_video = self.video_time - prev.video_time;
        if by_video.is_finite() && by_video != 0.0 {
            by_video
        } else {
            (self.timestamp - prev.timestamp) / 1000.0
        }
    }
}
