//! Squat
//!
//! Standing → Descending → Bottom → Ascending → Standing, driven by ear
//! height expressed as depth %. Getting back to Standing completes the rep.
//! A descent that stands back up before reaching bottom depth is dropped
//! without counting.

use super::machine::{FormAnalyzer, PhaseMachine};
use super::phase::{PeakMap, Phase};
use super::report::{
    put, AngleMap, FrameInput, FrameReport, HudConfig, Measurements, RepQuality,
};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::physics::{skeleton_depth, Skeleton};
use crate::pose::{BodySide, Degrees, DepthPercent, Pixels};

/// Depth beyond this leaves Standing; depth under it from Ascending ends the rep
const STANDING_MAX_DEPTH: f64 = 15.0;
/// Descent must reach this before a reversal counts as the bottom
const MIN_BOTTOM_DEPTH: f64 = 30.0;
/// Points the depth must come back off its max to register the reversal
const REVERSAL_POINTS: f64 = 3.0;
/// Points off the max that mark the drive up
const ASCENT_POINTS: f64 = 10.0;
/// Knee angle halfway through the descent/ascent
const MID_RANGE_KNEE_DEG: f64 = 135.0;

const TARGET_DEPTH: f64 = 80.0;
const MAX_TORSO_LEAN_DEG: f64 = 45.0;
const TARGET_LOCKOUT_KNEE_DEG: f64 = 165.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SquatPhase {
    Standing,
    Descending,
    Bottom,
    Ascending,
}

impl Phase for SquatPhase {
    const ALL: &'static [Self] = &[
        SquatPhase::Standing,
        SquatPhase::Descending,
        SquatPhase::Bottom,
        SquatPhase::Ascending,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            SquatPhase::Standing => "standing",
            SquatPhase::Descending => "descending",
            SquatPhase::Bottom => "bottom",
            SquatPhase::Ascending => "ascending",
        }
    }
}

const PHASE_NAMES: &[&str] = &["standing", "descending", "bottom", "ascending"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SquatAngles {
    pub depth: Option<f64>,
    pub ear_y: Option<f64>,
    pub knee: Option<f64>,
    pub hip: Option<f64>,
    pub spine: Option<f64>,
}

impl SquatAngles {
    pub fn measure(skeleton: &Skeleton, frame_height: Option<Pixels>, side: BodySide) -> Self {
        Self {
            depth: frame_height
                .and_then(|h| skeleton_depth(skeleton, h))
                .map(DepthPercent::value),
            ear_y: skeleton.ear_y_pixels().map(Pixels::value),
            knee: skeleton.best_knee_angle(side).map(Degrees::value),
            hip: skeleton
                .hip_angle(side)
                .or_else(|| skeleton.hip_angle(side.other()))
                .map(Degrees::value),
            spine: skeleton.spine_angle().map(Degrees::value),
        }
    }
}

impl Measurements for SquatAngles {
    fn to_angle_map(&self) -> AngleMap {
        let mut map = AngleMap::new();
        put(&mut map, "depth", self.depth);
        put(&mut map, "earY", self.ear_y);
        put(&mut map, "kneeAngle", self.knee);
        put(&mut map, "hipAngle", self.hip);
        put(&mut map, "spineAngle", self.spine);
        map
    }
}

pub struct SquatAnalyzer {
    machine: PhaseMachine<SquatPhase, SquatAngles>,
    side: BodySide,
    /// Deepest depth seen since the descent started
    max_depth: f64,
}

impl SquatAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self::with_side(config, BodySide::Right)
    }

    pub fn with_side(config: &AnalyzerConfig, side: BodySide) -> Self {
        Self {
            machine: PhaseMachine::new(SquatPhase::Standing, config),
            side,
            max_depth: 0.0,
        }
    }

    pub fn phase(&self) -> SquatPhase {
        self.machine.phase()
    }

    fn next_phase(&self, depth: f64) -> Option<SquatPhase> {
        match self.machine.phase() {
            SquatPhase::Standing if depth > STANDING_MAX_DEPTH => Some(SquatPhase::Descending),
            SquatPhase::Descending
                if self.max_depth >= MIN_BOTTOM_DEPTH
                    && depth <= self.max_depth - REVERSAL_POINTS =>
            {
                Some(SquatPhase::Bottom)
            }
            SquatPhase::Descending if depth < STANDING_MAX_DEPTH => Some(SquatPhase::Standing),
            SquatPhase::Bottom if depth <= self.max_depth - ASCENT_POINTS => {
                Some(SquatPhase::Ascending)
            }
            SquatPhase::Ascending if depth < STANDING_MAX_DEPTH => Some(SquatPhase::Standing),
            _ => None,
        }
    }

    fn peak_score(phase: SquatPhase, angles: &SquatAngles) -> Option<f64> {
        match phase {
            SquatPhase::Standing => angles.depth.map(|d| -d),
            SquatPhase::Bottom => angles.depth,
            SquatPhase::Descending | SquatPhase::Ascending => {
                angles.knee.map(|k| -(k - MID_RANGE_KNEE_DEG).abs())
            }
        }
    }

    fn score_rep(peaks: &PeakMap<SquatPhase, SquatAngles>) -> RepQuality {
        let mut quality = RepQuality::builder();
        let bottom = peaks.get(SquatPhase::Bottom).map(|p| &p.measurements);

        if let Some(depth) = bottom.and_then(|m| m.depth) {
            quality.metric("depth", depth).penalize(
                (TARGET_DEPTH - depth) * 0.8,
                "Sit deeper: aim for hips below the knees",
            );
        }
        if let Some(lean) = bottom.and_then(|m| m.spine) {
            quality
                .metric("torsoLean", lean)
                .penalize(lean - MAX_TORSO_LEAN_DEG, "Keep your chest up at the bottom");
        }
        if let Some(knee) = peaks.get(SquatPhase::Standing).and_then(|p| p.measurements.knee) {
            quality.metric("kneeLockout", knee).penalize(
                (TARGET_LOCKOUT_KNEE_DEG - knee) * 0.5,
                "Finish each rep standing fully upright",
            );
        }

        quality.build()
    }
}

impl FormAnalyzer for SquatAnalyzer {
    fn process_frame(&mut self, input: &FrameInput<'_>) -> Result<FrameReport, AnalysisError> {
        input.check()?;
        let angles = SquatAngles::measure(input.skeleton, input.frame_height, self.side);
        self.machine.tick();

        let mut completed = None;
        if let Some(depth) = angles.depth {
            if self.machine.phase() != SquatPhase::Standing {
                self.max_depth = self.max_depth.max(depth);
            }

            if self.machine.can_transition() {
                if let Some(next) = self.next_phase(depth) {
                    match (self.machine.phase(), next) {
                        (SquatPhase::Descending, SquatPhase::Standing) => {
                            self.machine.abandon_to(
                                next,
                                &[SquatPhase::Descending, SquatPhase::Bottom],
                            );
                            self.max_depth = 0.0;
                        }
                        (_, SquatPhase::Standing) => {
                            self.machine.transition_to(next);
                            completed = Some(self.machine.complete_rep(Self::score_rep));
                            self.max_depth = 0.0;
                        }
                        (_, SquatPhase::Descending) => {
                            self.machine.transition_to(next);
                            self.max_depth = depth;
                        }
                        _ => self.machine.transition_to(next),
                    }
                }
            }
        }

        let phase = self.machine.phase();
        self.machine.offer_peak(input, &angles, Self::peak_score(phase, &angles));
        // the deepest frame usually lands before the reversal is confirmed
        if phase == SquatPhase::Descending {
            let score = Self::peak_score(SquatPhase::Bottom, &angles);
            self.machine.offer_peak_to(SquatPhase::Bottom, input, &angles, score);
        }

        Ok(self.machine.report(angles.to_angle_map(), completed))
    }

    fn phases(&self) -> &'static [&'static str] {
        PHASE_NAMES
    }

    fn exercise_name(&self) -> &'static str {
        "Squat"
    }

    fn hud_config(&self) -> HudConfig {
        HudConfig {
            primary_metric: "depth",
            label: "Depth",
            unit: "%",
            gauge_min: 0.0,
            gauge_max: 100.0,
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

    /// Keeps the current phase so a rep already under way still counts
    /// once the lifter stands up.
    fn reset(&mut self) {
        self.machine.reset();
        self.max_depth = 0.0;
    }
}
