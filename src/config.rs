//! Option bags accepted by the analysis components
//!
//! Every struct deserializes from a partial camelCase object, so JS callers
//! only pass what they want to override.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pose::BodySide;

pub const DEFAULT_WINDOW_SIZE: usize = 3;
pub const DEFAULT_USER_HEIGHT_CM: f64 = 173.0;
pub const DEFAULT_MIN_FRAMES_IN_PHASE: u32 = 2;
pub const DEFAULT_CROP_MIN_CONFIDENCE: f64 = 0.3;
pub const DEFAULT_MIN_CROP_HEIGHT_FRACTION: f64 = 0.4;
/// Crops never grow past this share of source height, so there is always some zoom
pub const MAX_CROP_HEIGHT_FRACTION: f64 = 0.85;
pub const DEFAULT_WIDTH_PADDING: f64 = 1.4;
pub const DEFAULT_HEIGHT_PADDING: f64 = 1.3;

/// Aggregation used by the speed smoothing window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingMethod {
    #[default]
    Median,
    Mean,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeedSmoothingConfig {
    pub window_size: usize,
    pub user_height_cm: f64,
    pub preferred_side: BodySide,
    pub smoothing_method: SmoothingMethod,
}

impl Default for SpeedSmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            user_height_cm: DEFAULT_USER_HEIGHT_CM,
            preferred_side: BodySide::Right,
            smoothing_method: SmoothingMethod::Median,
        }
    }
}

impl SpeedSmoothingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        if !(self.user_height_cm.is_finite() && self.user_height_cm > 0.0) {
            return Err(ConfigError::InvalidUserHeight(self.user_height_cm));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Frames a phase must hold before it may be left
    pub min_frames_in_phase: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_frames_in_phase: DEFAULT_MIN_FRAMES_IN_PHASE,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_frames_in_phase == 0 {
            return Err(ConfigError::InvalidMinFramesInPhase);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    pub min_confidence: f64,
    pub min_crop_height_fraction: f64,
    pub width_padding: f64,
    pub height_padding: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_CROP_MIN_CONFIDENCE,
            min_crop_height_fraction: DEFAULT_MIN_CROP_HEIGHT_FRACTION,
            width_padding: DEFAULT_WIDTH_PADDING,
            height_padding: DEFAULT_HEIGHT_PADDING,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.min_confidence));
        }
        if !(self.min_crop_height_fraction > 0.0
            && self.min_crop_height_fraction <= MAX_CROP_HEIGHT_FRACTION)
        {
            return Err(ConfigError::InvalidCropHeightFraction(self.min_crop_height_fraction));
        }
        for padding in [self.width_padding, self.height_padding] {
            if !(padding.is_finite() && padding >= 1.0) {
                return Err(ConfigError::InvalidPadding(padding));
            }
        }
        Ok(())
    }
}

/// Options accepted when opening an analysis session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub analyzer: AnalyzerConfig,
    pub speed: SpeedSmoothingConfig,
    /// Source video height in pixels, needed by depth-driven exercises
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_height: Option<f64>,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyzer.validate()?;
        self.speed.validate()?;
        if let Some(h) = self.video_height.filter(|h| !(h.is_finite() && *h > 0.0)) {
            return Err(ConfigError::InvalidVideoHeight(h));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let speed = SpeedSmoothingConfig::default();
        assert_eq!(speed.window_size, 3);
        assert_eq!(speed.user_height_cm, 173.0);
        assert_eq!(speed.preferred_side, BodySide::Right);
        assert_eq!(speed.smoothing_method, SmoothingMethod::Median);
        assert_eq!(AnalyzerConfig::default().min_frames_in_phase, 2);
        assert!(CropConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let cfg: SpeedSmoothingConfig =
            serde_json::from_str(r#"{"windowSize": 5, "smoothingMethod": "mean"}"#).unwrap();
        assert_eq!(cfg.window_size, 5);
        assert_eq!(cfg.smoothing_method, SmoothingMethod::Mean);
        assert_eq!(cfg.user_height_cm, DEFAULT_USER_HEIGHT_CM);
    }

    #[test]
    fn test_even_window_rejected() {
        let cfg = SpeedSmoothingConfig { window_size: 4, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidWindowSize(4)));
        let cfg = SpeedSmoothingConfig { window_size: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_crop_bounds_rejected() {
        let cfg = CropConfig { min_confidence: 1.5, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = CropConfig { min_crop_height_fraction: 0.9, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = CropConfig { width_padding: 0.8, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidPadding(0.8)));
    }

    #[test]
    fn test_session_options_nest() {
        let cfg: SessionConfig = serde_json::from_str(
            r#"{
                "analyzer": {"minFramesInPhase": 3},
                "speed": {"preferredSide": "left"},
                "videoHeight": 1920
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.analyzer.min_frames_in_phase, 3);
        assert_eq!(cfg.speed.preferred_side, BodySide::Left);
        assert_eq!(cfg.speed.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(cfg.video_height, Some(1920.0));
        assert!(cfg.validate().is_ok());

        let cfg = SessionConfig { video_height: Some(0.0), ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidVideoHeight(0.0)));
    }

    #[test]
    fn test_zero_dwell_rejected() {
        let cfg = AnalyzerConfig { min_frames_in_phase: 0 };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidMinFramesInPhase));
    }
}
