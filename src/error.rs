//! Error types
//!
//! Missing landmarks and bad frame timing are not errors; those surface as
//! `None`. The enums here cover rejected configuration and failures inside
//! exercise logic that the frame guard swallows.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// A frame the exercise logic could not process
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("non-finite timestamp {0} ms")]
    NonFiniteTimestamp(f64),

    #[error("non-finite video time {0} s")]
    NonFiniteVideoTime(f64),

    #[error("keypoint {index} has non-finite coordinates")]
    NonFiniteKeypoint { index: usize },

    #[error("invalid keypoint buffer length: {len} (expected {expected})")]
    InvalidKeypointBuffer { len: usize, expected: usize },
}

/// A configuration value outside its accepted range
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("smoothing window must be an odd size >= 1, got {0}")]
    InvalidWindowSize(usize),

    #[error("user height must be positive, got {0} cm")]
    InvalidUserHeight(f64),

    #[error("minimum frames in phase must be >= 1")]
    InvalidMinFramesInPhase,

    #[error("confidence threshold must be within [0, 1], got {0}")]
    InvalidConfidence(f64),

    #[error("crop padding must be >= 1, got {0}")]
    InvalidPadding(f64),

    #[error("minimum crop height fraction must be within (0, 0.85], got {0}")]
    InvalidCropHeightFraction(f64),

    #[error("video height must be positive, got {0} px")]
    InvalidVideoHeight(f64),
}

/// Failures creating or configuring an analysis session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<AnalysisError> for JsValue {
    fn from(err: AnalysisError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<SessionError> for JsValue {
    fn from(err: SessionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = AnalysisError::InvalidKeypointBuffer { len: 12, expected: 99 };
        assert_eq!(err.to_string(), "invalid keypoint buffer length: 12 (expected 99)");

        let err: SessionError = ConfigError::InvalidWindowSize(4).into();
        assert_eq!(err.to_string(), "smoothing window must be an odd size >= 1, got 4");
    }
}
