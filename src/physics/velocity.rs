//! Wrist speed over pose tracks
//!
//! Batch: [`compute_frame_speeds`] runs once over an extracted track and
//! fills `angles.wristSpeed` on every frame. It never mutates its input.
//!
//! Live: [`LiveSpeedTracker`] estimates speed frame by frame while a video
//! is still being analyzed.

use super::one_euro::OneEuroFilter;
use super::skeleton::Skeleton;
use super::smoothing::smooth_speeds;
use crate::config::SpeedSmoothingConfig;
use crate::pose::{BodySide, FrameAngles, MetersPerSecond, PoseTrackFrame};

/// Unsmoothed speed between each frame and its predecessor
///
/// Index 0 has no predecessor and is always None.
pub fn raw_frame_speeds(
    frames: &[PoseTrackFrame],
    config: &SpeedSmoothingConfig,
) -> Vec<Option<f64>> {
    let skeletons: Vec<Skeleton> = frames
        .iter()
        .map(|f| Skeleton::new(f.keypoints.clone()))
        .collect();

    let mut raw = Vec::with_capacity(frames.len());
    if frames.is_empty() {
        return raw;
    }
    raw.push(None);
    for i in 1..frames.len() {
        let elapsed = frames[i].seconds_since(&frames[i - 1]);
        let speed = skeletons[i]
            .velocity(&skeletons[i - 1], elapsed, config.user_height_cm, config.preferred_side)
            .map(MetersPerSecond::value);
        raw.push(speed);
    }
    raw
}

/// Return a copy of `frames` with `angles.wristSpeed` set on every frame
///
/// Existing angle fields are preserved; frames without an angle bag get a
/// fresh one. An empty track yields an empty track.
pub fn compute_frame_speeds(
    frames: &[PoseTrackFrame],
    config: &SpeedSmoothingConfig,
) -> Vec<PoseTrackFrame> {
    let raw = raw_frame_speeds(frames, config);
    let smoothed = smooth_speeds(&raw, config.window_size, config.smoothing_method);

    let defined = raw.iter().filter(|s| s.is_some()).count();
    log::debug!(
        "computed wrist speeds for {} frames ({} raw samples defined, window {})",
        frames.len(),
        defined,
        config.window_size
    );

    frames
        .iter()
        .zip(smoothed)
        .map(|(frame, speed)| {
            let mut out = frame.clone();
            out.angles.get_or_insert_with(FrameAngles::default).wrist_speed = Some(speed);
            out
        })
        .collect()
}

/// True when every frame already carries a wrist speed
pub fn has_frame_speeds(frames: &[PoseTrackFrame]) -> bool {
    frames.iter().all(|f| f.wrist_speed().is_some())
}

/// Speeds are written once per track: a track that already has them is
/// returned as-is instead of being recomputed.
pub fn ensure_frame_speeds(
    frames: Vec<PoseTrackFrame>,
    config: &SpeedSmoothingConfig,
) -> Vec<PoseTrackFrame> {
    if has_frame_speeds(&frames) {
        return frames;
    }
    compute_frame_speeds(&frames, config)
}

/// Frame-by-frame wrist speed for live analysis
#[derive(Clone, Debug)]
pub struct LiveSpeedTracker {
    prev: Option<(Skeleton, f64)>,
    filter: OneEuroFilter,
    user_height_cm: f64,
    preferred_side: BodySide,
}

impl LiveSpeedTracker {
    pub fn new(config: &SpeedSmoothingConfig) -> Self {
        Self {
            prev: None,
            filter: OneEuroFilter::for_wrist_speed(),
            user_height_cm: config.user_height_cm,
            preferred_side: config.preferred_side,
        }
    }

    /// Feed the next frame (time in seconds); returns smoothed speed when defined
    ///
    /// A gap the velocity calculation rejects (seek, stall) also restarts the
    /// filter so speeds from before the jump don't bleed into the new segment.
    pub fn update(&mut self, skeleton: &Skeleton, time_s: f64) -> Option<MetersPerSecond> {
        let raw = self.prev.as_ref().and_then(|(prev, prev_t)| {
            skeleton.velocity(prev, time_s - prev_t, self.user_height_cm, self.preferred_side)
        });
        self.prev = Some((skeleton.clone(), time_s));

        match raw {
            Some(speed) => Some(MetersPerSecond(self.filter.filter(time_s, speed.value()))),
            None => {
                self.filter.reset();
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.prev = None;
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothingMethod;
    use crate::physics::skeleton::test_support::standing;
    use crate::pose::{Keypoint, RIGHT_WRIST};

    /// Track whose right wrist drops `step_px` every frame at 10 fps
    fn track(steps: &[f64]) -> Vec<PoseTrackFrame> {
        let mut y = 550.0;
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                y += step;
                let mut kps = standing();
                kps[RIGHT_WRIST] = Keypoint::new(425.0, y, 0.9);
                PoseTrackFrame {
                    frame_index: i as u32,
                    timestamp: i as f64 * 100.0,
                    video_time: i as f64 * 0.1,
                    keypoints: kps,
                    score: 0.9,
                    angles: None,
                }
            })
            .collect()
    }

    fn config() -> SpeedSmoothingConfig {
        // 1000 px body at 100 cm: 1 px = 1 mm
        SpeedSmoothingConfig { user_height_cm: 100.0, ..Default::default() }
    }

    #[test]
    fn test_raw_speeds() {
        let raw = raw_frame_speeds(&track(&[0.0, 100.0, 200.0]), &config());
        assert_eq!(raw[0], None);
        assert!((raw[1].unwrap() - 1.0).abs() < 1e-9);
        assert!((raw[2].unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_frame_gets_a_speed() {
        let out = compute_frame_speeds(&track(&[0.0, 200.0, 200.0, 0.0, 200.0, 200.0]), &config());
        assert_eq!(out.len(), 6);
        assert!(has_frame_speeds(&out));
        // raw: [-, 2, 2, 0, 2, 2]; median window 3 keeps the reversal frame at 2
        assert_eq!(out[3].wrist_speed(), Some(2.0));
        assert_eq!(out[0].wrist_speed(), Some(2.0));
    }

    #[test]
    fn test_mean_method_drags_reversal() {
        let cfg = SpeedSmoothingConfig { smoothing_method: SmoothingMethod::Mean, ..config() };
        let out = compute_frame_speeds(&track(&[0.0, 200.0, 200.0, 0.0, 200.0, 200.0]), &cfg);
        assert_eq!(out[3].wrist_speed(), Some(1.33));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let frames = track(&[0.0, 100.0]);
        let _ = compute_frame_speeds(&frames, &config());
        assert!(frames.iter().all(|f| f.angles.is_none()));
    }

    #[test]
    fn test_existing_angles_preserved() {
        let mut frames = track(&[0.0, 100.0]);
        frames[1].angles = Some(FrameAngles { spine_angle: Some(12.0), ..Default::default() });
        let out = compute_frame_speeds(&frames, &config());
        assert_eq!(out[1].angles.as_ref().unwrap().spine_angle, Some(12.0));
    }

    #[test]
    fn test_seek_gap_is_undefined_not_zero() {
        let mut frames = track(&[0.0, 100.0, 100.0]);
        frames[2].video_time = 5.0;
        let raw = raw_frame_speeds(&frames, &config());
        assert_eq!(raw[2], None);
    }

    #[test]
    fn test_recompute_is_stable() {
        let frames = track(&[0.0, 150.0, 30.0, 0.0, 220.0, 90.0, 10.0]);
        let once = compute_frame_speeds(&frames, &config());
        let twice = compute_frame_speeds(&once, &config());
        for (a, b) in once.iter().zip(&twice) {
            let (a, b) = (a.wrist_speed().unwrap(), b.wrist_speed().unwrap());
            assert!((a - b).abs() <= 0.01);
        }
    }

    #[test]
    fn test_ensure_skips_computed_tracks() {
        let mut frames = compute_frame_speeds(&track(&[0.0, 100.0]), &config());
        frames[0].angles.as_mut().unwrap().wrist_speed = Some(42.0);
        let out = ensure_frame_speeds(frames, &config());
        assert_eq!(out[0].wrist_speed(), Some(42.0));
    }

    #[test]
    fn test_empty_track() {
        assert!(compute_frame_speeds(&[], &config()).is_empty());
    }

    #[test]
    fn test_live_tracker_needs_a_predecessor() {
        let frames = track(&[0.0, 100.0, 100.0]);
        let mut live = LiveSpeedTracker::new(&config());
        let skel = |f: &PoseTrackFrame| Skeleton::new(f.keypoints.clone());
        assert!(live.update(&skel(&frames[0]), 0.0).is_none());
        let first = live.update(&skel(&frames[1]), 0.1).unwrap();
        assert!((first.value() - 1.0).abs() < 1e-9);
        assert!(live.update(&skel(&frames[2]), 0.2).is_some());

        live.reset();
        assert!(live.update(&skel(&frames[2]), 0.3).is_none());
    }
}
