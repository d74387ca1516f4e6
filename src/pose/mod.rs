//! Pose module - landmark layout, keypoints, unit types and track frames
//!
//! Re-exports only. All logic in submodules.

mod frame;
mod landmarks;
mod units;

pub use frame::{FrameAngles, PoseTrackFrame};
pub use landmarks::{
    BodySide, Keypoint,
    // Constants
    LANDMARK_COUNT, VALUES_PER_LANDMARK, MIN_KEYPOINT_SCORE,
    NOSE, LEFT_EAR, RIGHT_EAR,
    LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST, LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE,
};
pub use units::{DepthPercent, Degrees, MetersPerSecond, Normalized, Pixels};
