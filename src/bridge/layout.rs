//! Placement and crop entry points

use wasm_bindgen::prelude::*;

use super::js::{optional_from_js, options_from_js, to_js};
use crate::config::CropConfig;
use crate::layout::{
    calculate_video_placement, is_landscape_video_with_threshold, person_crop, scale_factors,
    CropRegion, Dimensions, VideoPlacement, DEFAULT_LANDSCAPE_THRESHOLD,
};
use crate::physics::Skeleton;

/// Where the video is drawn inside its container
///
/// Cover mode (pan to `crop`) only when `zoomed` and a crop is given.
/// Returns `null` for zero-sized videos or containers.
#[wasm_bindgen(js_name = calculateVideoPlacement)]
#[allow(clippy::too_many_arguments)]
pub fn calculate_video_placement_js(
    video_width: f64,
    video_height: f64,
    container_width: f64,
    container_height: f64,
    offset_left: f64,
    offset_top: f64,
    zoomed: bool,
    crop: JsValue,
) -> Result<JsValue, JsValue> {
    let crop: Option<CropRegion> = optional_from_js(crop)?;
    let placement = calculate_video_placement(
        Dimensions::new(video_width, video_height),
        Dimensions::new(container_width, container_height),
        (offset_left, offset_top),
        zoomed,
        crop.as_ref(),
    );
    to_js(&placement)
}

#[wasm_bindgen(js_name = calculateScaleFactors)]
pub fn calculate_scale_factors(
    placement: JsValue,
    video_width: f64,
    video_height: f64,
) -> Result<JsValue, JsValue> {
    let placement: VideoPlacement = serde_wasm_bindgen::from_value(placement)?;
    to_js(&scale_factors(&placement, Dimensions::new(video_width, video_height)))
}

/// Crop around the person in a flat 99-value keypoint buffer
///
/// @param {object} [options] - { minConfidence, minCropHeightFraction,
///   widthPadding, heightPadding }
#[wasm_bindgen(js_name = calculatePersonCrop)]
pub fn calculate_person_crop(
    keypoints: &[f64],
    source_width: f64,
    source_height: f64,
    target_aspect: f64,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let config: CropConfig = options_from_js(options)?;
    config.validate()?;
    let skeleton = Skeleton::from_flat(keypoints)?;
    let crop = person_crop(
        skeleton.keypoints(),
        Dimensions::new(source_width, source_height),
        target_aspect,
        &config,
    );
    to_js(&crop)
}

#[wasm_bindgen(js_name = isLandscapeVideo)]
pub fn is_landscape_video_js(width: f64, height: f64, threshold: Option<f64>) -> bool {
    let threshold = threshold.unwrap_or(DEFAULT_LANDSCAPE_THRESHOLD);
    is_landscape_video_with_threshold(width, height, threshold)
}
