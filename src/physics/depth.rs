//! Ear-height squat depth
//!
//! Depth is read from how far down the frame the ears have travelled.
//! Normalized ear Y of 0.15 (head near the top of frame) maps to 0 % and
//! 0.65 maps to 100 %, linearly, clamped at both ends.

use super::skeleton::Skeleton;
use crate::pose::{DepthPercent, Normalized, Pixels};

/// Normalized ear Y treated as standing tall
pub const DEPTH_TOP_EAR_Y: f64 = 0.15;

/// Normalized ear Y treated as full depth
pub const DEPTH_BOTTOM_EAR_Y: f64 = 0.65;

/// Map a normalized ear Y onto 0-100 % depth
pub fn depth_percent(ear_y: Normalized) -> DepthPercent {
    let span = DEPTH_BOTTOM_EAR_Y - DEPTH_TOP_EAR_Y;
    let fraction = (ear_y.value() - DEPTH_TOP_EAR_Y) / span;
    DepthPercent((fraction * 100.0).clamp(0.0, 100.0))
}

/// Depth for a skeleton inside a frame `frame_height` pixels tall
///
/// None when neither ear is visible or the frame height is unusable.
pub fn skeleton_depth(skeleton: &Skeleton, frame_height: Pixels) -> Option<DepthPercent> {
    let ear_y = skeleton.ear_y_pixels()?.normalize(frame_height)?;
    Some(depth_percent(ear_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::skeleton::test_support::standing_skeleton;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_depth_anchor_points() {
        assert_abs_diff_eq!(depth_percent(Normalized(0.15)).value(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(depth_percent(Normalized(0.4)).value(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(depth_percent(Normalized(0.65)).value(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_depth_clamps() {
        assert_eq!(depth_percent(Normalized(0.05)).value(), 0.0);
        assert_eq!(depth_percent(Normalized(0.9)).value(), 100.0);
    }

    #[test]
    fn test_skeleton_depth_uses_frame_height() {
        // ears at y=95 of a 380 px frame -> 0.25 -> 20 %
        let depth = skeleton_depth(&standing_skeleton(), Pixels(380.0)).unwrap();
        assert_abs_diff_eq!(depth.value(), 20.0, epsilon = 1e-9);
        assert!(skeleton_depth(&standing_skeleton(), Pixels(0.0)).is_none());
    }
}
