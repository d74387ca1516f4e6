//! Analyzer module - rep-phase detection and form scoring
//!
//! Re-exports only. All logic in submodules.

mod exercise;
mod guard;
mod machine;
mod phase;
mod report;
mod session;
mod squat;
mod swing;

pub use exercise::ExerciseKind;
pub use guard::{FrameGuard, DEGRADED_MESSAGE, DEGRADED_THRESHOLD};
pub use machine::{CompletedRep, FormAnalyzer, PhaseMachine};
pub use phase::{PeakMap, Phase, PhasePeak};
pub use report::{
    AngleMap, FrameInput, FrameReport, HudConfig, Measurements, QualityBuilder, RepPosition,
    RepQuality,
};
pub use session::AnalysisSession;
pub use squat::{SquatAnalyzer, SquatAngles, SquatPhase};
pub use swing::{SwingAnalyzer, SwingAngles, SwingPhase};
