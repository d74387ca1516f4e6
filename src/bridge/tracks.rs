//! Pose-track entry points

use wasm_bindgen::prelude::*;

use super::js::{options_from_js, to_js};
use crate::config::SpeedSmoothingConfig;
use crate::physics::ensure_frame_speeds;
use crate::pose::PoseTrackFrame;

/// Fill `angles.wristSpeed` on every frame of a pose track
///
/// Tracks that already carry speeds on every frame come back unchanged.
///
/// @param {PoseTrackFrame[]} frames
/// @param {object} [options] - { windowSize, userHeightCm, preferredSide, smoothingMethod }
#[wasm_bindgen(js_name = computeFrameSpeeds)]
pub fn compute_frame_speeds(frames: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let config: SpeedSmoothingConfig = options_from_js(options)?;
    config.validate()?;
    let frames: Vec<PoseTrackFrame> = serde_wasm_bindgen::from_value(frames)?;
    to_js(&ensure_frame_speeds(frames, &config))
}
