//! Layout module - video placement and person-centered crops
//!
//! Re-exports only. All logic in submodules.

mod crop;
mod placement;

pub use crop::{keypoint_bounds, person_crop, FALLBACK_CROP_HEIGHT_FRACTION};
pub use placement::{
    calculate_video_placement, contain_placement, cover_placement, is_landscape_video,
    is_landscape_video_with_threshold, scale_factors, ContainPlacement, CoverPlacement, CropRegion,
    Dimensions, ScaleFactors, VideoPlacement, DEFAULT_LANDSCAPE_THRESHOLD,
};
