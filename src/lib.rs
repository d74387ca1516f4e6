//! Form Coach Web - rep counting and form analysis for exercise video
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen runtime entry points (panic hook, logging, version)
//!
//! Frames of pose keypoints go through an [`analyzer::AnalysisSession`],
//! which tracks the exercise phase, counts reps and captures each rep's
//! peak positions. Batch speed smoothing, checkpoint navigation and
//! video placement math sit alongside it.

pub mod analyzer;
mod bridge;
pub mod config;
pub mod error;
pub mod layout;
pub mod navigation;
pub mod physics;
pub mod pose;

use wasm_bindgen::prelude::*;

pub use analyzer::{AnalysisSession, ExerciseKind, FormAnalyzer, FrameInput, FrameReport};
pub use bridge::{
    calculate_person_crop, calculate_scale_factors, calculate_video_placement_js,
    compute_frame_speeds, is_landscape_video_js, JsAnalysisSession,
};
pub use config::{AnalyzerConfig, CropConfig, SessionConfig, SpeedSmoothingConfig};
pub use error::{AnalysisError, ConfigError, SessionError};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console
///
/// @param {string} level - "trace", "debug", "info", "warn" or "error"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let level = parse_log_level(level);
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("form-coach-web {} logging at {}", env!("CARGO_PKG_VERSION"), level);
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn parse_log_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}
