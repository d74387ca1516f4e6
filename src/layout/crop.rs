//! Person-centered crop
//!
//! Frames the tracked person for thumbnails and zoomed playback. The crop
//! follows the confident keypoints, is padded, fitted to the target aspect
//! and held between a minimum and maximum share of the source height.

use super::placement::{CropRegion, Dimensions};
use crate::config::{CropConfig, MAX_CROP_HEIGHT_FRACTION};
use crate::pose::Keypoint;

/// Height of the centered box used when no keypoint is confident enough
pub const FALLBACK_CROP_HEIGHT_FRACTION: f64 = 0.85;

/// Union box of finite keypoints scoring at least `min_confidence`
pub fn keypoint_bounds(keypoints: &[Keypoint], min_confidence: f64) -> Option<CropRegion> {
    let mut confident = keypoints
        .iter()
        .filter(|k| k.is_finite() && k.score >= min_confidence);

    let first = confident.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for k in confident {
        min_x = min_x.min(k.x);
        min_y = min_y.min(k.y);
        max_x = max_x.max(k.x);
        max_y = max_y.max(k.y);
    }
    Some(CropRegion::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Crop in source pixels around the person, `target_aspect` = width / height
///
/// The result always has the target aspect. Keeping it inside the source
/// only ever moves it; when it is larger than the source on an axis it is
/// centered on that axis instead. `None` for an undrawable source or aspect,
/// or a config that fails [`CropConfig::validate`].
pub fn person_crop(
    keypoints: &[Keypoint],
    source: Dimensions,
    target_aspect: f64,
    config: &CropConfig,
) -> Option<CropRegion> {
    if let Err(err) = config.validate() {
        log::debug!("person crop skipped: {}", err);
        return None;
    }
    let drawable = source.width.is_finite()
        && source.height.is_finite()
        && source.width > 0.0
        && source.height > 0.0;
    if !drawable || !(target_aspect.is_finite() && target_aspect > 0.0) {
        return None;
    }

    let bounds = keypoint_bounds(keypoints, config.min_confidence).unwrap_or_else(|| {
        let height = source.height * FALLBACK_CROP_HEIGHT_FRACTION;
        CropRegion::centered_at(
            source.width / 2.0,
            source.height / 2.0,
            height * target_aspect,
            height,
        )
    });
    let (cx, cy) = (bounds.cx(), bounds.cy());

    let mut width = bounds.width * config.width_padding;
    let mut height = bounds.height * config.height_padding;

    // grow the short side to reach the target aspect
    if width / height.max(f64::MIN_POSITIVE) > target_aspect {
        height = width / target_aspect;
    } else {
        width = height * target_aspect;
    }

    let min_height = source.height * config.min_crop_height_fraction;
    let max_height = source.height * MAX_CROP_HEIGHT_FRACTION;
    let clamped = height.clamp(min_height, max_height);
    if clamped != height {
        height = clamped;
        width = height * target_aspect;
    }

    Some(CropRegion::new(
        fit_axis(cx - width / 2.0, width, source.width),
        fit_axis(cy - height / 2.0, height, source.height),
        width,
        height,
    ))
}

/// Slide `start` so [start, start + len] sits inside [0, extent]
fn fit_axis(start: f64, len: f64, extent: f64) -> f64 {
    if len >= extent {
        (extent - len) / 2.0
    } else {
        start.clamp(0.0, extent - len)
    }
}
