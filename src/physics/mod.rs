//! Physics module - joint angles, depth, and wrist speed
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod depth;
mod one_euro;
pub(crate) mod skeleton;
mod smoothing;
mod velocity;

pub use angles::{angle_between, joint_angle, lean_from_vertical, swing_from_hanging};
pub use depth::{depth_percent, skeleton_depth, DEPTH_BOTTOM_EAR_Y, DEPTH_TOP_EAR_Y};
pub use one_euro::OneEuroFilter;
pub use skeleton::{Skeleton, MAX_VELOCITY_GAP_SECONDS};
pub use smoothing::{mean, median, round_to_hundredths, smooth_speeds};
pub use velocity::{
    compute_frame_speeds, ensure_frame_speeds, has_frame_speeds, raw_frame_speeds,
    LiveSpeedTracker,
};
