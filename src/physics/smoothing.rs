//! Centered-window speed smoothing
//!
//! Median is the default aggregate. At the top and bottom of a movement the
//! wrist genuinely stops for a frame, and a mean window drags the
//! neighbouring peaks down with it; the median keeps them and still drops
//! isolated spikes.

use crate::config::SmoothingMethod;

/// Median of a non-empty slice; 0.0 for an empty one
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Smooth a raw speed series with a centered window
///
/// Each output index aggregates the defined samples within `window / 2`
/// positions on either side (clipped at the ends). An index whose window
/// holds no defined sample smooths to 0. Output is rounded to 2 decimals
/// and always has the input's length.
pub fn smooth_speeds(
    raw: &[Option<f64>],
    window: usize,
    method: SmoothingMethod,
) -> Vec<f64> {
    let half = window / 2;
    let mut scratch = Vec::with_capacity(window);

    (0..raw.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(raw.len());
            scratch.clear();
            scratch.extend(raw[start..end].iter().flatten().copied());

            let value = match method {
                SmoothingMethod::Median => median(&scratch),
                SmoothingMethod::Mean => mean(&scratch),
            };
            round_to_hundredths(value)
        })
        .collect()
}
