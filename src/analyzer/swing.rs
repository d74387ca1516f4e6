//! Kettlebell swing
//!
//! Top → Connect → Bottom → Release → Top, driven by torso lean (spine
//! angle from vertical). Returning to Top completes the rep. Straightening
//! back up out of Connect abandons the attempt without counting it.

use super::machine::{FormAnalyzer, PhaseMachine};
use super::phase::{PeakMap, Phase};
use super::report::{
    put, AngleMap, FrameInput, FrameReport, HudConfig, Measurements, RepQuality,
};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::physics::Skeleton;
use crate::pose::{BodySide, Degrees};

/// Lean past this leaves Top; lean under it from Release ends the rep
const HINGE_START_DEG: f64 = 20.0;
/// Lean past this during Connect reaches Bottom
const BOTTOM_ENTER_DEG: f64 = 45.0;
/// Bottom ends once the torso has risen this far off the deepest hinge...
const RELEASE_RISE_DEG: f64 = 10.0;
/// ...and is back above this lean
const RELEASE_MAX_DEG: f64 = 60.0;

/// Quality targets
const TARGET_HINGE_DEG: f64 = 60.0;
const TARGET_LOCKOUT_DEG: f64 = 15.0;
const TARGET_ARM_HEIGHT_DEG: f64 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwingPhase {
    Top,
    Connect,
    Bottom,
    Release,
}

impl Phase for SwingPhase {
    const ALL: &'static [Self] = &[
        SwingPhase::Top,
        SwingPhase::Connect,
        SwingPhase::Bottom,
        SwingPhase::Release,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            SwingPhase::Top => "top",
            SwingPhase::Connect => "connect",
            SwingPhase::Bottom => "bottom",
            SwingPhase::Release => "release",
        }
    }
}

const PHASE_NAMES: &[&str] = &["top", "connect", "bottom", "release"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwingAngles {
    pub spine: Option<f64>,
    pub arm_vertical: Option<f64>,
    pub arm_to_spine: Option<f64>,
    pub hip: Option<f64>,
}

impl SwingAngles {
    pub fn measure(skeleton: &Skeleton, side: BodySide) -> Self {
        Self {
            spine: skeleton.spine_angle().map(Degrees::value),
            arm_vertical: skeleton.best_arm_vertical_angle(side).map(Degrees::value),
            arm_to_spine: skeleton.arm_to_spine_angle(side).map(Degrees::value),
            hip: skeleton
                .hip_angle(side)
                .or_else(|| skeleton.hip_angle(side.other()))
                .map(Degrees::value),
        }
    }
}

impl Measurements for SwingAngles {
    fn to_angle_map(&self) -> AngleMap {
        let mut map = AngleMap::new();
        put(&mut map, "spineAngle", self.spine);
        put(&mut map, "armVerticalAngle", self.arm_vertical);
        put(&mut map, "armAngle", self.arm_to_spine);
        put(&mut map, "hipAngle", self.hip);
        map
    }
}

pub struct SwingAnalyzer {
    machine: PhaseMachine<SwingPhase, SwingAngles>,
    side: BodySide,
    /// Deepest lean seen since the hinge started this rep
    deepest_hinge: Option<f64>,
}

impl SwingAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::with_side(config, BodySide::Right)
    }

    pub fn with_side(config: &AnalyzerConfig, side: BodySide) -> Self {
        Self {
            machine: PhaseMachine::new(SwingPhase::Top, config),
            side,
            deepest_hinge: None,
        }
    }

    pub fn phase(&self) -> SwingPhase {
        self.machine.phase()
    }

    fn next_phase(&self, spine: f64) -> Option<SwingPhase> {
        match self.machine.phase() {
            SwingPhase::Top if spine > HINGE_START_DEG => Some(SwingPhase::Connect),
            SwingPhase::Connect if spine > BOTTOM_ENTER_DEG => Some(SwingPhase::Bottom),
            SwingPhase::Connect if spine < HINGE_START_DEG => Some(SwingPhase::Top),
            SwingPhase::Bottom => {
                let deepest = self.deepest_hinge.unwrap_or(spine);
                (spine <= deepest - RELEASE_RISE_DEG && spine < RELEASE_MAX_DEG)
                    .then_some(SwingPhase::Release)
            }
            SwingPhase::Release if spine < HINGE_START_DEG => Some(SwingPhase::Top),
            _ => None,
        }
    }

    fn peak_score(phase: SwingPhase, angles: &SwingAngles) -> Option<f64> {
        match phase {
            // most upright
            SwingPhase::Top => angles.spine.map(|s| -s),
            // arms closest to hanging as the bell meets the hips
            SwingPhase::Connect => angles.arm_vertical.map(|a| -a),
            SwingPhase::Bottom => angles.spine,
            // highest float
            SwingPhase::Release => angles.arm_vertical,
        }
    }

    fn score_rep(peaks: &PeakMap<SwingPhase, SwingAngles>) -> RepQuality {
        let mut quality = RepQuality::builder();

        if let Some(hinge) = peaks.get(SwingPhase::Bottom).and_then(|p| p.measurements.spine) {
            quality.metric("hingeDepth", hinge).penalize(
                (TARGET_HINGE_DEG - hinge) * 1.5,
                "Hinge deeper: push the hips back at the bottom",
            );
        }
        if let Some(lockout) = peaks.get(SwingPhase::Top).and_then(|p| p.measurements.spine) {
            quality.metric("topLockout", lockout).penalize(
                (lockout - TARGET_LOCKOUT_DEG) * 2.0,
                "Stand tall at the top and squeeze the glutes",
            );
        }
        let release = peaks.get(SwingPhase::Release);
        if let Some(height) = release.and_then(|p| p.measurements.arm_vertical) {
            quality.metric("armHeight", height).penalize(
                (TARGET_ARM_HEIGHT_DEG - height) * 0.5,
                "Snap the hips harder to float the bell to chest height",
            );
        }

        quality.build()
    }
}

impl FormAnalyzer for SwingAnalyzer {
    fn process_frame(&mut self, input: &FrameInput<'_>) -> Result<FrameReport, AnalysisError> {
        input.check()?;
        let angles = SwingAngles::measure(input.skeleton, self.side);
        self.machine.tick();

        let mut completed = None;
        if let Some(spine) = angles.spine {
            if matches!(self.machine.phase(), SwingPhase::Connect | SwingPhase::Bottom) {
                self.deepest_hinge = Some(self.deepest_hinge.map_or(spine, |d| d.max(spine)));
            }

            if self.machine.can_transition() {
                if let Some(next) = self.next_phase(spine) {
                    match (self.machine.phase(), next) {
                        (SwingPhase::Connect, SwingPhase::Top) => {
                            self.machine
                                .abandon_to(next, &[SwingPhase::Connect, SwingPhase::Bottom]);
                            self.deepest_hinge = None;
                        }
                        (_, SwingPhase::Top) => {
                            self.machine.transition_to(next);
                            completed = Some(self.machine.complete_rep(Self::score_rep));
                            self.deepest_hinge = None;
                        }
                        _ => self.machine.transition_to(next),
                    }
                }
            }
        }

        let phase = self.machine.phase();
        self.machine.offer_peak(input, &angles, Self::peak_score(phase, &angles));

        Ok(self.machine.report(angles.to_angle_map(), completed))
    }

    fn phases(&self) -> &'static [&'static str] {
        PHASE_NAMES
    }

    fn exercise_name(&self) -> &'static str {
        "Kettlebell Swing"
    }

    fn hud_config(&self) -> HudConfig {
        HudConfig {
            primary_metric: "spineAngle",
            label: "Hinge",
            unit: "°",
            gauge_min: 0.0,
            gauge_max: 90.0,
        }
    }

    fn current_phase(&self) -> &'static str {
        self.machine.phase().name()
    }

    fn rep_count(&self) -> u32 {
        self.machine.rep_count()
    }

    fn last_rep_quality(&self) -> Option<&RepQuality> {
        self.machine.last_quality()
    }

    /// Also returns to Top: a swing reset mid-rep would otherwise wait for a
    /// release it never saw the start of.
    fn reset(&mut self) {
        self.machine.reset();
        self.machine.restore_initial_phase();
        self.deepest_hinge = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::skeleton::test_support::hinged;

    /// Feed each (spine, arm) pose for `hold` frames at 30 fps
    fn drive(
        analyzer: &mut SwingAnalyzer,
        poses: &[(f64, f64)],
        hold: usize,
    ) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        let mut frame = 0usize;
        for &(spine, arm) in poses {
            let skeleton = hinged(spine, arm);
            for _ in 0..hold {
                let t = frame as f64 / 30.0;
                let input = FrameInput::new(&skeleton, t * 1000.0).with_video_time(t);
                reports.push(analyzer.process_frame(&input).unwrap());
                frame += 1;
            }
        }
        reports
    }

    const ONE_SWING: &[(f64, f64)] = &[
        (10.0, 5.0),
        (30.0, 2.0),
        (50.0, 4.0),
        (70.0, 10.0),
        (50.0, 60.0),
        (30.0, 85.0),
        (10.0, 40.0),
    ];

    #[test]
    fn test_one_swing_one_rep() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        let reports = drive(&mut swing, ONE_SWING, 4);

        let completions: Vec<&FrameReport> =
            reports.iter().filter(|r| r.rep_completed).collect();
        assert_eq!(completions.len(), 1);
        let done = completions[0];
        assert_eq!(done.rep_count, 1);
        assert_eq!(done.phase, "top");

        let names: Vec<_> = done.rep_positions.as_ref().unwrap().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["top", "connect", "bottom", "release"]);

        let counts: Vec<u32> = reports.iter().map(|r| r.rep_count).collect();
        assert!(counts.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_minimum_dwell_swing_still_counts() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        let reports = drive(&mut swing, ONE_SWING, 2);

        let done: Vec<&FrameReport> = reports.iter().filter(|r| r.rep_completed).collect();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].rep_positions.as_ref().unwrap().len(), 4);
        let counts: Vec<u32> = reports.iter().map(|r| r.rep_count).collect();
        assert!(counts.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(swing.rep_count(), 1);
    }

    #[test]
    fn test_aborted_hinge_returns_to_top_uncounted() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        let mut poses = vec![(10.0, 5.0), (30.0, 2.0)];
        poses.extend_from_slice(ONE_SWING);
        let reports = drive(&mut swing, &poses, 3);

        // straightening up out of Connect goes back to Top with nothing counted
        assert_eq!(reports[6].phase, "top");
        assert!(reports[..12].iter().all(|r| r.rep_count == 0 && !r.rep_completed));

        let done: Vec<&FrameReport> = reports.iter().filter(|r| r.rep_completed).collect();
        assert_eq!(done.len(), 1);
        assert_eq!(swing.rep_count(), 1);

        // the connect position comes from the full swing, not the abandoned one
        let positions = done[0].rep_positions.as_ref().unwrap();
        let connect = positions.iter().find(|p| p.name == "connect").unwrap();
        assert!(connect.video_time.unwrap() > 0.2);
    }

    #[test]
    fn test_phase_sequence() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        let reports = drive(&mut swing, ONE_SWING, 4);
        let mut seen: Vec<&str> = reports.iter().map(|r| r.phase).collect();
        seen.dedup();
        assert_eq!(seen, vec!["top", "connect", "bottom", "release", "top"]);
    }

    #[test]
    fn test_peaks_pick_best_frames() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        let reports = drive(&mut swing, ONE_SWING, 4);
        let done = reports.iter().find(|r| r.rep_completed).unwrap();
        let positions = done.rep_positions.as_ref().unwrap();

        let bottom = positions.iter().find(|p| p.name == "bottom").unwrap();
        assert!((bottom.angles["spineAngle"] - 70.0).abs() < 1e-6);

        let release = positions.iter().find(|p| p.name == "release").unwrap();
        assert!((release.angles["armVerticalAngle"] - 85.0).abs() < 1e-6);

        let quality = done.rep_quality.as_ref().unwrap();
        assert!(quality.score > 0.0 && quality.score <= 100.0);
        assert!((quality.metrics["hingeDepth"] - 70.0).abs() < 1e-6);
    }

    #[test]
    fn test_dwell_counts_frames_in_current_phase() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        drive(&mut swing, &[(10.0, 0.0)], 4);
        // after a long dwell in Top one crossing frame is enough to leave it...
        let reports = drive(&mut swing, &[(30.0, 0.0)], 1);
        assert_eq!(reports[0].phase, "connect");
        // ...but the next frame can't advance again, even well past the threshold
        let reports = drive(&mut swing, &[(55.0, 0.0)], 1);
        assert_eq!(reports[0].phase, "connect");

        let mut strict = SwingAnalyzer::new(&AnalyzerConfig { min_frames_in_phase: 3 });
        let reports = drive(&mut strict, &[(10.0, 0.0), (30.0, 0.0)], 1);
        assert!(reports.iter().all(|r| r.phase == "top"));
    }

    #[test]
    fn test_short_dwell_blocks_skipping_phases() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        // a straight jump from upright to deep hinge only advances one phase
        let reports = drive(&mut swing, &[(10.0, 0.0), (70.0, 0.0)], 2);
        let mut seen: Vec<&str> = reports.iter().map(|r| r.phase).collect();
        seen.dedup();
        assert_eq!(seen, vec!["top", "connect"]);
    }

    #[test]
    fn test_reset_zeroes_and_returns_to_top() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        drive(&mut swing, ONE_SWING, 4);
        drive(&mut swing, &[(30.0, 0.0), (50.0, 0.0)], 4);
        assert_eq!(swing.rep_count(), 1);
        assert_eq!(swing.phase(), SwingPhase::Bottom);

        swing.reset();
        assert_eq!(swing.rep_count(), 0);
        assert!(swing.last_rep_quality().is_none());
        assert_eq!(swing.phase(), SwingPhase::Top);

        drive(&mut swing, ONE_SWING, 4);
        assert_eq!(swing.rep_count(), 1);
    }

    #[test]
    fn test_missing_torso_holds_phase() {
        let mut swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        let empty = Skeleton::new(Vec::new());
        for i in 0..10 {
            let report = swing.process_frame(&FrameInput::new(&empty, i as f64)).unwrap();
            assert_eq!(report.phase, "top");
            assert!(report.angles.is_empty());
        }
    }

    #[test]
    fn test_descriptors() {
        let swing = SwingAnalyzer::new(&AnalyzerConfig::default());
        assert_eq!(swing.phases(), &["top", "connect", "bottom", "release"]);
        assert_eq!(swing.current_phase(), "top");
        assert_eq!(swing.hud_config().primary_metric, "spineAngle");
    }
}
