//! Frame input and analyzer output records

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::AnalysisError;
use crate::physics::Skeleton;
use crate::pose::Pixels;

/// Named angle and metric values; unknown values are left out
pub type AngleMap = BTreeMap<&'static str, f64>;

/// An exercise's per-frame measurement bundle
pub trait Measurements: Clone + fmt::Debug {
    fn to_angle_map(&self) -> AngleMap;
}

/// Insert `value` under `key` when it is known
pub(crate) fn put(map: &mut AngleMap, key: &'static str, value: Option<f64>) {
    if let Some(v) = value {
        map.insert(key, v);
    }
}

/// Everything an analyzer needs for one frame
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub skeleton: &'a Skeleton,
    pub timestamp_ms: f64,
    pub video_time: Option<f64>,
    /// Source frame height, needed for normalized measurements
    pub frame_height: Option<Pixels>,
    pub thumbnail: Option<&'a str>,
}

impl<'a> FrameInput<'a> {
    pub fn new(skeleton: &'a Skeleton, timestamp_ms: f64) -> Self {
        Self {
            skeleton,
            timestamp_ms,
            video_time: None,
            frame_height: None,
            thumbnail: None,
        }
    }

    pub fn with_video_time(mut self, video_time: f64) -> Self {
        self.video_time = Some(video_time);
        self
    }

    pub fn with_frame_height(mut self, height: Pixels) -> Self {
        self.frame_height = Some(height);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: &'a str) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    /// Reject inputs the phase logic cannot reason about
    pub fn check(&self) -> Result<(), AnalysisError> {
        if !self.timestamp_ms.is_finite() {
            return Err(AnalysisError::NonFiniteTimestamp(self.timestamp_ms));
        }
        if let Some(t) = self.video_time.filter(|t| !t.is_finite()) {
            return Err(AnalysisError::NonFiniteVideoTime(t));
        }
        self.skeleton.check_finite()
    }
}

/// Captured peak of one phase of a completed rep
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepPosition {
    pub name: &'static str,
    pub skeleton: Skeleton,
    /// Milliseconds
    pub timestamp: f64,
    pub video_time: Option<f64>,
    pub angles: AngleMap,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Form score for one completed rep
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RepQuality {
    /// 0-100
    pub score: f64,
    pub metrics: BTreeMap<&'static str, f64>,
    pub feedback: Vec<String>,
}

impl RepQuality {
    /// Start at 100 and subtract penalties as metrics are assessed
    pub fn builder() -> QualityBuilder {
        QualityBuilder {
            penalty: 0.0,
            quality: RepQuality::default(),
        }
    }
}

pub struct QualityBuilder {
    penalty: f64,
    quality: RepQuality,
}

impl QualityBuilder {
    pub fn metric(&mut self, name: &'static str, value: f64) -> &mut Self {
        self.quality.metrics.insert(name, value);
        self
    }

    /// Subtract `penalty` points and attach `feedback` when positive
    pub fn penalize(&mut self, penalty: f64, feedback: &str) -> &mut Self {
        if penalty > 0.0 {
            self.penalty += penalty;
            self.quality.feedback.push(feedback.to_string());
        }
        self
    }

    pub fn build(&mut self) -> RepQuality {
        let mut quality = std::mem::take(&mut self.quality);
        quality.score = (100.0 - self.penalty).clamp(0.0, 100.0).round();
        quality
    }
}

/// Per-frame result handed back to the caller
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub phase: &'static str,
    pub rep_completed: bool,
    pub rep_count: u32,
    pub angles: AngleMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_positions: Option<Vec<RepPosition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_quality: Option<RepQuality>,
}

/// Live overlay hints for an exercise
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudConfig {
    /// Key in [`FrameReport::angles`] to show as the main gauge
    pub primary_metric: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub gauge_min: f64,
    pub gauge_max: f64,
}
