//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod js;
mod layout;
mod session;
mod tracks;

pub use layout::{
    calculate_person_crop, calculate_scale_factors, calculate_video_placement_js,
    is_landscape_video_js,
};
pub use session::JsAnalysisSession;
pub use tracks::compute_frame_speeds;
