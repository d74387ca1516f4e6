//! Shared phase/rep machinery
//!
//! Every exercise is the same state machine shape: a cyclic phase graph,
//! a frame-count dwell requirement before any transition, a per-phase peak
//! slot for the rep in progress, and a rep counter bumped on the terminal
//! transition. [`PhaseMachine`] holds that state; exercises own one and
//! supply the transition predicates, peak scores and quality scorer.

use super::phase::{PeakMap, Phase, PhasePeak};
use super::report::{
    AngleMap, FrameInput, FrameReport, HudConfig, Measurements, RepPosition, RepQuality,
};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;

/// One exercise's frame-by-frame form analysis
///
/// Not safe for interleaved calls: deliver frames one at a time, and only
/// call [`FormAnalyzer::reset`] between frames. Results depend only on frame
/// order and the supplied times, never on wall-clock time, so live and
/// cached replays behave the same.
pub trait FormAnalyzer {
    fn process_frame(&mut self, input: &FrameInput<'_>) -> Result<FrameReport, AnalysisError>;

    /// Phase names in cycle order
    fn phases(&self) -> &'static [&'static str];

    fn exercise_name(&self) -> &'static str;

    fn hud_config(&self) -> HudConfig;

    fn current_phase(&self) -> &'static str;

    fn rep_count(&self) -> u32;

    fn last_rep_quality(&self) -> Option<&RepQuality>;

    /// Zero the rep count, drop in-progress peaks and the last quality
    fn reset(&mut self);
}

/// Outcome of a completed rep
pub type CompletedRep = (RepQuality, Vec<RepPosition>);

#[derive(Clone, Debug)]
pub struct PhaseMachine<P: Phase, M> {
    initial: P,
    phase: P,
    frames_in_phase: u32,
    min_frames_in_phase: u32,
    rep_count: u32,
    last_quality: Option<RepQuality>,
    peaks: PeakMap<P, M>,
}

impl<P: Phase, M: Measurements> PhaseMachine<P, M> {
    pub fn new(initial: P, config: &AnalyzerConfig) -> Self {
        Self {
            initial,
            phase: initial,
            frames_in_phase: 0,
            min_frames_in_phase: config.min_frames_in_phase.max(1),
            rep_count: 0,
            last_quality: None,
            peaks: PeakMap::new(),
        }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    pub fn frames_in_phase(&self) -> u32 {
        self.frames_in_phase
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn last_quality(&self) -> Option<&RepQuality> {
        self.last_quality.as_ref()
    }

    pub fn peaks(&self) -> &PeakMap<P, M> {
        &self.peaks
    }

    /// Count the current frame toward the dwell in the current phase
    pub fn tick(&mut self) {
        self.frames_in_phase = self.frames_in_phase.saturating_add(1);
    }

    /// Dwell requirement met
    pub fn can_transition(&self) -> bool {
        self.frames_in_phase >= self.min_frames_in_phase
    }

    pub fn transition_to(&mut self, next: P) {
        log::debug!(
            "phase {} -> {} after {} frames",
            self.phase.name(),
            next.name(),
            self.frames_in_phase
        );
        self.phase = next;
        self.frames_in_phase = 0;
    }

    /// Offer the current frame as the peak of the current phase.
    /// A `None` score means the frame can't be ranked and is skipped.
    pub fn offer_peak(
        &mut self,
        input: &FrameInput<'_>,
        measurements: &M,
        score: Option<f64>,
    ) -> bool {
        self.offer_peak_to(self.phase, input, measurements, score)
    }

    /// Offer the current frame as the peak of `phase`, which need not be
    /// the current one. Nothing is cloned unless the frame wins.
    pub fn offer_peak_to(
        &mut self,
        phase: P,
        input: &FrameInput<'_>,
        measurements: &M,
        score: Option<f64>,
    ) -> bool {
        let Some(score) = score.filter(|s| s.is_finite()) else {
            return false;
        };
        if !self.peaks.accepts(phase, score) {
            return false;
        }
        let peak = PhasePeak {
            skeleton: input.skeleton.clone(),
            timestamp_ms: input.timestamp_ms,
            video_time: input.video_time,
            measurements: measurements.clone(),
            score,
            thumbnail: input.thumbnail.map(str::to_owned),
        };
        self.peaks.offer(phase, peak)
    }

    /// Fall back to `next` without counting a rep, dropping the peaks the
    /// abandoned attempt captured for `discard`
    pub fn abandon_to(&mut self, next: P, discard: &[P]) {
        log::debug!("{} abandoned, back to {}", self.phase.name(), next.name());
        for &phase in discard {
            self.peaks.discard(phase);
        }
        self.transition_to(next);
    }

    /// Close out the rep in progress
    ///
    /// Scores the collected peaks, bumps the rep count, and turns every
    /// captured peak into a position. Phases without a peak this rep simply
    /// produce no position.
    pub fn complete_rep(
        &mut self,
        score: impl FnOnce(&PeakMap<P, M>) -> RepQuality,
    ) -> CompletedRep {
        let quality = score(&self.peaks);
        self.rep_count += 1;

        let positions: Vec<RepPosition> = self
            .peaks
            .drain()
            .into_iter()
            .map(|(phase, peak)| RepPosition {
                name: phase.name(),
                skeleton: peak.skeleton,
                timestamp: peak.timestamp_ms,
                video_time: peak.video_time,
                angles: peak.measurements.to_angle_map(),
                score: peak.score,
                thumbnail: peak.thumbnail,
            })
            .collect();

        log::info!(
            "rep {} complete: score {:.0}, {} positions captured",
            self.rep_count,
            quality.score,
            positions.len()
        );

        self.last_quality = Some(quality.clone());
        (quality, positions)
    }

    /// Clear counters, peaks and last quality. The phase is left alone;
    /// exercises that want a fresh cycle call [`Self::restore_initial_phase`].
    pub fn reset(&mut self) {
        self.frames_in_phase = 0;
        self.rep_count = 0;
        self.last_quality = None;
        self.peaks.clear();
    }

    pub fn restore_initial_phase(&mut self) {
        self.phase = self.initial;
        self.frames_in_phase = 0;
    }

    pub fn report(&self, angles: AngleMap, completed: Option<CompletedRep>) -> FrameReport {
        let rep_completed = completed.is_some();
        let (rep_quality, rep_positions) = match completed {
            Some((q, p)) => (Some(q), Some(p)),
            None => (None, None),
        };
        FrameReport {
            phase: self.phase.name(),
            rep_completed,
            rep_count: self.rep_count,
            angles,
            rep_positions,
            rep_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::phase::tests::Tri;
    use super::*;
    use crate::physics::Skeleton;

    #[derive(Clone, Debug)]
    struct Level(f64);

    impl Measurements for Level {
        fn to_angle_map(&self) -> AngleMap {
            AngleMap::from([("level", self.0)])
        }
    }

    fn machine(min_frames: u32) -> PhaseMachine<Tri, Level> {
        PhaseMachine::new(Tri::A, &AnalyzerConfig { min_frames_in_phase: min_frames })
    }

    #[test]
    fn test_dwell_gates_transition() {
        let mut m = machine(2);
        assert!(!m.can_transition());
        m.tick();
        assert!(!m.can_transition());
        m.tick();
        assert!(m.can_transition());
        m.transition_to(Tri::B);
        assert_eq!(m.phase(), Tri::B);
        assert_eq!(m.frames_in_phase(), 0);
        assert!(!m.can_transition());
    }

    #[test]
    fn test_complete_rep_converts_peaks() {
        let mut m = machine(1);
        let skeleton = Skeleton::new(Vec::new());
        let input = FrameInput::new(&skeleton, 100.0).with_video_time(0.1).with_thumbnail("data:a");
        assert!(m.offer_peak(&input, &Level(1.0), Some(1.0)));
        assert!(!m.offer_peak(&input, &Level(0.5), None));
        m.transition_to(Tri::C);
        m.offer_peak(&input, &Level(3.0), Some(3.0));

        let (quality, positions) = m.complete_rep(|peaks| {
            assert_eq!(peaks.len(), 2);
            RepQuality { score: 88.0, ..Default::default() }
        });
        assert_eq!(quality.score, 88.0);
        assert_eq!(m.rep_count(), 1);
        assert_eq!(m.last_quality().unwrap().score, 88.0);
        assert!(m.peaks().is_empty());

        let names: Vec<_> = positions.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(positions[0].thumbnail.as_deref(), Some("data:a"));
        assert_eq!(positions[1].angles["level"], 3.0);
    }

    #[test]
    fn test_reset_keeps_phase() {
        let mut m = machine(1);
        m.transition_to(Tri::B);
        m.complete_rep(|_| RepQuality::default());
        m.tick();
        m.reset();
        assert_eq!(m.rep_count(), 0);
        assert!(m.last_quality().is_none());
        assert_eq!(m.frames_in_phase(), 0);
        assert_eq!(m.phase(), Tri::B);

        m.restore_initial_phase();
        assert_eq!(m.phase(), Tri::A);
    }

    #[test]
    fn test_report_carries_rep_only_on_completion() {
        let mut m = machine(1);
        let idle = m.report(AngleMap::new(), None);
        assert!(!idle.rep_completed);
        assert!(idle.rep_positions.is_none());

        let done = m.complete_rep(|_| RepQuality::default());
        let report = m.report(AngleMap::new(), Some(done));
        assert!(report.rep_completed);
        assert_eq!(report.rep_count, 1);
        assert!(report.rep_quality.is_some());
    }

    #[test]
    fn test_abandon_drops_peaks_without_counting() {
        let mut m = machine(1);
        let skeleton = Skeleton::new(Vec::new());
        let input = FrameInput::new(&skeleton, 0.0);
        m.offer_peak(&input, &Level(1.0), Some(1.0));
        m.transition_to(Tri::B);
        assert!(m.offer_peak_to(Tri::C, &input, &Level(2.0), Some(2.0)));
        assert!(!m.offer_peak_to(Tri::C, &input, &Level(1.5), Some(1.5)));
        assert_eq!(m.peaks().len(), 2);

        m.abandon_to(Tri::A, &[Tri::B, Tri::C]);
        assert_eq!(m.phase(), Tri::A);
        assert_eq!(m.rep_count(), 0);
        assert_eq!(m.frames_in_phase(), 0);
        assert_eq!(m.peaks().len(), 1);
    }
}
