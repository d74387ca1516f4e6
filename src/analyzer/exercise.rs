//! Exercise registry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::machine::FormAnalyzer;
use super::squat::SquatAnalyzer;
use super::swing::SwingAnalyzer;
use crate::config::AnalyzerConfig;
use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Swing,
    Squat,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 2] = [ExerciseKind::Swing, ExerciseKind::Squat];

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Swing => "swing",
            ExerciseKind::Squat => "squat",
        }
    }

    pub fn build(self, config: &AnalyzerConfig) -> Box<dyn FormAnalyzer> {
        match self {
            ExerciseKind::Swing => Box::new(SwingAnalyzer::new(config)),
            ExerciseKind::Squat => Box::new(SquatAnalyzer::new(config)),
        }
    }
}

impl FromStr for ExerciseKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "swing" | "kettlebell-swing" | "kettlebell_swing" => Ok(ExerciseKind::Swing),
            "squat" => Ok(ExerciseKind::Squat),
            _ => Err(SessionError::UnknownExercise(s.to_string())),
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
