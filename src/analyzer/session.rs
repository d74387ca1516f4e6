//! Analysis session
//!
//! Owns everything one video's analysis needs: the exercise analyzer, the
//! frame guard, the live wrist-speed tracker and every position captured so
//! far. Frames go in one at a time; the session is the single owner of the
//! analyzer so calls are serialized by construction.

use std::collections::BTreeMap;

use super::exercise::ExerciseKind;
use super::guard::FrameGuard;
use super::machine::FormAnalyzer;
use super::report::{FrameInput, FrameReport, HudConfig, RepPosition, RepQuality};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::navigation::{
    build_checkpoint_list, find_next_checkpoint, find_previous_checkpoint, resolve_position_at,
    Checkpoint, PositionAt,
};
use crate::physics::{LiveSpeedTracker, Skeleton};
use crate::pose::Pixels;

pub struct AnalysisSession {
    kind: ExerciseKind,
    analyzer: Box<dyn FormAnalyzer>,
    guard: FrameGuard,
    speed: LiveSpeedTracker,
    positions_by_rep: BTreeMap<u32, Vec<RepPosition>>,
    frame_height: Option<Pixels>,
}

impl AnalysisSession {
    pub fn new(kind: ExerciseKind, config: &SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        log::info!("{} session opened", kind);
        Ok(Self {
            kind,
            analyzer: kind.build(&config.analyzer),
            guard: FrameGuard::new(),
            speed: LiveSpeedTracker::new(&config.speed),
            positions_by_rep: BTreeMap::new(),
            frame_height: config.video_height.map(Pixels),
        })
    }

    pub fn from_name(exercise: &str, config: &SessionConfig) -> Result<Self, SessionError> {
        Self::new(exercise.parse()?, config)
    }

    /// Analyze one frame
    ///
    /// `None` means the frame was skipped after an analysis error; check
    /// [`Self::is_degraded`] to see whether that has become persistent.
    /// The session's video height fills in when the input carries none.
    pub fn process_frame(&mut self, input: FrameInput<'_>) -> Option<FrameReport> {
        let input = match (input.frame_height, self.frame_height) {
            (None, Some(h)) => input.with_frame_height(h),
            _ => input,
        };

        let analyzer = &mut self.analyzer;
        let mut report = self.guard.run(|| analyzer.process_frame(&input))?;

        let time_s = input.video_time.unwrap_or(input.timestamp_ms / 1000.0);
        if let Some(speed) = self.speed.update(input.skeleton, time_s) {
            report.angles.insert("wristSpeed", speed.value());
        }

        if let Some(positions) = report.rep_positions.as_ref() {
            self.positions_by_rep.insert(report.rep_count, positions.clone());
        }
        Some(report)
    }

    /// Analyze one frame from a flat `[x, y, score] × 33` buffer
    ///
    /// A malformed buffer counts as a failed frame like any other, so a
    /// stream of them degrades the session instead of aborting it.
    pub fn process_flat(
        &mut self,
        keypoints: &[f64],
        timestamp_ms: f64,
        video_time: Option<f64>,
        thumbnail: Option<&str>,
    ) -> Option<FrameReport> {
        let skeleton = match Skeleton::from_flat(keypoints) {
            Ok(skeleton) => skeleton,
            Err(err) => return self.guard.record(Err::<FrameReport, _>(err)),
        };
        let mut input = FrameInput::new(&skeleton, timestamp_ms);
        if let Some(t) = video_time {
            input = input.with_video_time(t);
        }
        if let Some(thumbnail) = thumbnail {
            input = input.with_thumbnail(thumbnail);
        }
        self.process_frame(input)
    }

    /// Zero the count and drop captured positions, speed history and the
    /// error streak. Whether the phase restarts is up to the exercise.
    pub fn reset(&mut self) {
        self.analyzer.reset();
        self.guard.reset();
        self.speed.reset();
        self.positions_by_rep.clear();
        log::info!("{} session reset (phase {})", self.kind, self.analyzer.current_phase());
    }

    pub fn set_frame_height(&mut self, height: Option<Pixels>) {
        self.frame_height = height.filter(|h| h.value().is_finite() && h.value() > 0.0);
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn rep_count(&self) -> u32 {
        self.analyzer.rep_count()
    }

    pub fn phase(&self) -> &'static str {
        self.analyzer.current_phase()
    }

    pub fn phases(&self) -> &'static [&'static str] {
        self.analyzer.phases()
    }

    pub fn exercise_name(&self) -> &'static str {
        self.analyzer.exercise_name()
    }

    pub fn hud_config(&self) -> HudConfig {
        self.analyzer.hud_config()
    }

    pub fn last_rep_quality(&self) -> Option<&RepQuality> {
        self.analyzer.last_rep_quality()
    }

    pub fn is_degraded(&self) -> bool {
        self.guard.is_degraded()
    }

    pub fn degraded_message(&self) -> Option<&'static str> {
        self.guard.message()
    }

    pub fn positions(&self) -> &BTreeMap<u32, Vec<RepPosition>> {
        &self.positions_by_rep
    }

    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        build_checkpoint_list(&self.positions_by_rep, self.analyzer.phases())
    }

    pub fn previous_checkpoint(&self, current_time: f64) -> Option<Checkpoint> {
        find_previous_checkpoint(&self.checkpoints(), current_time).cloned()
    }

    pub fn next_checkpoint(&self, current_time: f64) -> Option<Checkpoint> {
        find_next_checkpoint(&self.checkpoints(), current_time).cloned()
    }

    pub fn position_at(&self, time: f64) -> PositionAt {
        resolve_position_at(&self.checkpoints(), time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::skeleton::test_support::hinged;
    use proptest::prelude::*;

    const ONE_SWING: &[(f64, f64)] = &[
        (10.0, 5.0),
        (30.0, 2.0),
        (50.0, 4.0),
        (70.0, 10.0),
        (50.0, 60.0),
        (30.0, 85.0),
        (10.0, 40.0),
    ];

    /// Feed `poses` at 30 fps starting from `start` seconds, each held `hold` frames
    fn feed(
        session: &mut AnalysisSession,
        poses: &[(f64, f64)],
        hold: usize,
        start: f64,
    ) -> f64 {
        let mut t = start;
        for &(spine, arm) in poses {
            let skeleton = hinged(spine, arm);
            for _ in 0..hold {
                let input = FrameInput::new(&skeleton, t * 1000.0).with_video_time(t);
                session.process_frame(input);
                t += 1.0 / 30.0;
            }
        }
        t
    }

    fn swing_session() -> AnalysisSession {
        AnalysisSession::from_name("swing", &SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_unknown_exercise() {
        let err = AnalysisSession::from_name("burpee", &SessionConfig::default()).err();
        assert_eq!(err, Some(SessionError::UnknownExercise("burpee".into())));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = SessionConfig::default();
        cfg.speed.window_size = 2;
        assert!(matches!(
            AnalysisSession::new(ExerciseKind::Swing, &cfg),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_positions_become_checkpoints() {
        let mut session = swing_session();
        let end = feed(&mut session, ONE_SWING, 3, 0.0);
        feed(&mut session, ONE_SWING, 3, end);
        assert_eq!(session.rep_count(), 2);
        assert_eq!(session.positions().len(), 2);

        let list = session.checkpoints();
        assert_eq!(list.len(), 8);
        assert!(list.windows(2).all(|w| w[0].video_time <= w[1].video_time));
        assert_eq!(list[0].rep_num, 1);
        assert_eq!(list[7].rep_num, 2);

        let mid = list[5].video_time;
        assert_eq!(session.previous_checkpoint(mid), Some(list[4].clone()));
        assert_eq!(session.next_checkpoint(mid), Some(list[6].clone()));
        assert_eq!(session.position_at(mid).rep_num, list[5].rep_num);
    }

    #[test]
    fn test_wrist_speed_telemetry() {
        let mut session = swing_session();
        let a = hinged(40.0, 10.0);
        let b = hinged(40.0, 30.0);
        let first = session
            .process_frame(FrameInput::new(&a, 0.0).with_video_time(0.0))
            .unwrap();
        assert!(!first.angles.contains_key("wristSpeed"));
        let second = session
            .process_frame(FrameInput::new(&b, 33.0).with_video_time(0.033))
            .unwrap();
        assert!(second.angles["wristSpeed"] > 0.0);
    }

    #[test]
    fn test_bad_frames_degrade_then_recover() {
        let mut session = swing_session();
        let good = hinged(10.0, 5.0);
        for i in 0..5 {
            let input = FrameInput::new(&good, f64::NAN).with_video_time(i as f64);
            assert!(session.process_frame(input).is_none());
        }
        assert!(session.is_degraded());
        assert!(session.degraded_message().is_some());

        let report = session.process_frame(FrameInput::new(&good, 200.0).with_video_time(0.2));
        assert!(report.is_some());
        assert!(!session.is_degraded());
    }

    #[test]
    fn test_malformed_buffers_degrade_then_recover() {
        let mut session = swing_session();
        for i in 0..5 {
            let t = i as f64 / 30.0;
            assert!(session.process_flat(&[0.0; 12], t * 1000.0, Some(t), None).is_none());
        }
        assert!(session.is_degraded());
        assert_eq!(session.rep_count(), 0);

        let flat: Vec<f64> = hinged(10.0, 5.0)
            .keypoints()
            .iter()
            .flat_map(|k| [k.x, k.y, k.score])
            .collect();
        let report = session.process_flat(&flat, 200.0, Some(0.2), Some("data:x"));
        assert_eq!(report.map(|r| r.phase), Some("top"));
        assert!(!session.is_degraded());
    }

    #[test]
    fn test_reset_clears_positions() {
        let mut session = swing_session();
        feed(&mut session, ONE_SWING, 3, 0.0);
        assert_eq!(session.rep_count(), 1);

        session.reset();
        assert_eq!(session.rep_count(), 0);
        assert!(session.checkpoints().is_empty());
        assert!(session.last_rep_quality().is_none());
        assert_eq!(session.phase(), "top");
    }

    #[test]
    fn test_squat_uses_session_video_height() {
        let cfg = SessionConfig { video_height: Some(1000.0), ..Default::default() };
        let mut session = AnalysisSession::new(ExerciseKind::Squat, &cfg).unwrap();
        let skeleton = Skeleton::new(crate::physics::skeleton::test_support::standing());
        let report = session.process_frame(FrameInput::new(&skeleton, 0.0)).unwrap();
        // ears at y=95 of 1000 sit above the standing line
        assert_eq!(report.angles["depth"], 0.0);
        assert_eq!(report.phase, "standing");
    }

    proptest! {
        #[test]
        fn prop_rep_count_monotonic_until_reset(
            spines in prop::collection::vec(0.0f64..90.0, 1..120),
            reset_at in 0usize..120,
        ) {
            let mut session = swing_session();
            let mut last = 0;
            for (i, &spine) in spines.iter().enumerate() {
                if i == reset_at {
                    session.reset();
                    prop_assert_eq!(session.rep_count(), 0);
                    prop_assert!(session.last_rep_quality().is_none());
                    last = 0;
                }
                let skeleton = hinged(spine, 20.0);
                let t = i as f64 / 30.0;
                let report = session
                    .process_frame(FrameInput::new(&skeleton, t * 1000.0).with_video_time(t))
                    .unwrap();
                prop_assert!(report.rep_count == last || report.rep_count == last + 1);
                prop_assert_eq!(report.rep_completed, report.rep_count == last + 1);
                last = report.rep_count;
            }
        }
    }
}
