//! `AnalysisSession` JS class
//!
//! Thin wrapper over the native session: flat keypoint buffers in, plain
//! JS objects out, plus an optional rep-completed callback.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::js::{options_from_js, to_js};
use crate::analyzer::{AnalysisSession, RepPosition, RepQuality};
use crate::config::SessionConfig;
use crate::pose::Pixels;

/// Payload handed to the `onRepCompleted` callback
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RepCompletedEvent<'a> {
    rep_count: u32,
    quality: &'a RepQuality,
    positions: &'a [RepPosition],
}

#[wasm_bindgen(js_name = AnalysisSession)]
pub struct JsAnalysisSession {
    inner: AnalysisSession,
    on_rep_completed: Option<js_sys::Function>,
}

#[wasm_bindgen(js_class = AnalysisSession)]
impl JsAnalysisSession {
    /// @param {string} exercise - "swing" or "squat"
    /// @param {object} [options] - { analyzer, speed, videoHeight }
    #[wasm_bindgen(constructor)]
    pub fn new(exercise: &str, options: JsValue) -> Result<JsAnalysisSession, JsValue> {
        let config: SessionConfig = options_from_js(options)?;
        let inner = AnalysisSession::from_name(exercise, &config)?;
        Ok(JsAnalysisSession {
            inner,
            on_rep_completed: None,
        })
    }

    /// Analyze one frame of 99 values (33 × x, y, score in source pixels)
    ///
    /// Returns the frame report, or `null` when the frame was skipped. A
    /// malformed buffer is skipped too and counts toward degraded analysis.
    #[wasm_bindgen(js_name = processFrame)]
    pub fn process_frame(
        &mut self,
        keypoints: &[f64],
        timestamp_ms: f64,
        video_time: Option<f64>,
        thumbnail: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let report = self
            .inner
            .process_flat(keypoints, timestamp_ms, video_time, thumbnail.as_deref());
        let Some(report) = report else {
            return Ok(JsValue::NULL);
        };

        if let (Some(callback), Some(quality), Some(positions)) = (
            &self.on_rep_completed,
            report.rep_quality.as_ref(),
            report.rep_positions.as_deref(),
        ) {
            let event = RepCompletedEvent {
                rep_count: report.rep_count,
                quality,
                positions,
            };
            match to_js(&event) {
                Ok(value) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                        log::warn!("onRepCompleted callback threw: {:?}", err);
                    }
                }
                Err(err) => log::warn!("onRepCompleted payload failed to serialize: {:?}", err),
            }
        }

        to_js(&report)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Source video height, needed for squat depth
    #[wasm_bindgen(js_name = setVideoHeight)]
    pub fn set_video_height(&mut self, height: Option<f64>) {
        self.inner.set_frame_height(height.map(Pixels));
    }

    #[wasm_bindgen(getter, js_name = repCount)]
    pub fn rep_count(&self) -> u32 {
        self.inner.rep_count()
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    /// Phase names in cycle order
    pub fn phases(&self) -> js_sys::Array {
        self.inner
            .phases()
            .iter()
            .map(|p| JsValue::from_str(p))
            .collect()
    }

    #[wasm_bindgen(getter, js_name = exerciseName)]
    pub fn exercise_name(&self) -> String {
        self.inner.exercise_name().to_string()
    }

    #[wasm_bindgen(js_name = hudConfig)]
    pub fn hud_config(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.hud_config())
    }

    #[wasm_bindgen(js_name = lastRepQuality)]
    pub fn last_rep_quality(&self) -> Result<JsValue, JsValue> {
        match self.inner.last_rep_quality() {
            Some(q) => to_js(q),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(getter, js_name = isDegraded)]
    pub fn is_degraded(&self) -> bool {
        self.inner.is_degraded()
    }

    #[wasm_bindgen(getter, js_name = degradedMessage)]
    pub fn degraded_message(&self) -> Option<String> {
        self.inner.degraded_message().map(str::to_string)
    }

    /// All captured positions as `{ repNum, position, videoTime }[]`
    pub fn checkpoints(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.checkpoints())
    }

    #[wasm_bindgen(js_name = previousCheckpoint)]
    pub fn previous_checkpoint(&self, current_time: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.previous_checkpoint(current_time))
    }

    #[wasm_bindgen(js_name = nextCheckpoint)]
    pub fn next_checkpoint(&self, current_time: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.next_checkpoint(current_time))
    }

    /// `{ repNum, position }` shown at `time`
    #[wasm_bindgen(js_name = positionAt)]
    pub fn position_at(&self, time: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.position_at(time))
    }

    /// @param {Function} callback - called with { repCount, quality, positions }
    #[wasm_bindgen(js_name = onRepCompleted)]
    pub fn on_rep_completed(&mut self, callback: js_sys::Function) {
        self.on_rep_completed = Some(callback);
    }
}
