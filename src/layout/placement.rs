//! Video placement inside a display container
//!
//! Reproduces how a browser lays out a video element so overlays drawn in
//! native video pixels land on the right spot. Contain mode letterboxes;
//! cover mode fills the container and pans so a crop region sits centered.

use serde::{Deserialize, Serialize};

use crate::physics::round_to_hundredths;

/// Width/height ratio above which a video counts as landscape
pub const DEFAULT_LANDSCAPE_THRESHOLD: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Axis-aligned rectangle in source-video pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Region of the given size centered on (cx, cy)
    pub fn centered_at(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }
}

/// Letterboxed placement; `left`/`top` include the element's own offset
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Cover placement; the scaled video may overflow the container
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    /// CSS `object-position` that gives the same pan
    pub object_position: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum VideoPlacement {
    Contain(ContainPlacement),
    Cover(CoverPlacement),
}

impl VideoPlacement {
    /// Displayed video box relative to the container's parent
    pub fn rect(&self) -> CropRegion {
        match self {
            VideoPlacement::Contain(p) => CropRegion::new(p.left, p.top, p.width, p.height),
            VideoPlacement::Cover(p) => CropRegion::new(p.left, p.top, p.width, p.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

/// Fit inside the container, preserving aspect ratio
pub fn contain_placement(
    video: Dimensions,
    container: Dimensions,
    offset: (f64, f64),
) -> Option<ContainPlacement> {
    if !video.is_drawable() || !container.is_drawable() {
        return None;
    }

    let (width, height, left, top) = if video.aspect() > container.aspect() {
        // relatively wider: bars above and below
        let height = container.width / video.aspect();
        (container.width, height, 0.0, (container.height - height) / 2.0)
    } else {
        let width = container.height * video.aspect();
        (width, container.height, (container.width - width) / 2.0, 0.0)
    };

    Some(ContainPlacement {
        left: left + offset.0,
        top: top + offset.1,
        width,
        height,
    })
}

/// Fill the container and pan so `crop`'s center lands in the middle
///
/// The translation is not clamped: a crop near the frame edge can pull the
/// video far enough that the container shows past the edge of the frame.
pub fn cover_placement(
    video: Dimensions,
    container: Dimensions,
    offset: (f64, f64),
    crop: &CropRegion,
) -> Option<CoverPlacement> {
    if !video.is_drawable() || !container.is_drawable() {
        return None;
    }

    let scale = (container.width / video.width).max(container.height / video.height);
    let left = container.width / 2.0 - crop.cx() * scale;
    let top = container.height / 2.0 - crop.cy() * scale;

    let pct_x = round_to_hundredths(crop.cx() / video.width * 100.0);
    let pct_y = round_to_hundredths(crop.cy() / video.height * 100.0);

    Some(CoverPlacement {
        left: left + offset.0,
        top: top + offset.1,
        width: video.width * scale,
        height: video.height * scale,
        scale,
        object_position: format!("{}% {}%", pct_x, pct_y),
    })
}

/// Cover only when zoomed with a crop to follow, contain otherwise
pub fn calculate_video_placement(
    video: Dimensions,
    container: Dimensions,
    offset: (f64, f64),
    zoomed: bool,
    crop: Option<&CropRegion>,
) -> Option<VideoPlacement> {
    match crop {
        Some(crop) if zoomed => {
            cover_placement(video, container, offset, crop).map(VideoPlacement::Cover)
        }
        _ => contain_placement(video, container, offset).map(VideoPlacement::Contain),
    }
}

/// Per-axis factors mapping native video pixels onto the displayed box
pub fn scale_factors(placement: &VideoPlacement, video: Dimensions) -> Option<ScaleFactors> {
    if !video.is_drawable() {
        return None;
    }
    let rect = placement.rect();
    Some(ScaleFactors {
        x: rect.width / video.width,
        y: rect.height / video.height,
    })
}

pub fn is_landscape_video(width: f64, height: f64) -> bool {
    is_landscape_video_with_threshold(width, height, DEFAULT_LANDSCAPE_THRESHOLD)
}

/// Strictly wider than `threshold`; zero height is never landscape
pub fn is_landscape_video_with_threshold(width: f64, height: f64, threshold: f64) -> bool {
    height > 0.0 && width / height > threshold
}
