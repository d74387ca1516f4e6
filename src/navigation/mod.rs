//! Navigation module - rep/phase checkpoints over captured positions
//!
//! Re-exports only. All logic in submodules.

mod checkpoints;

pub use checkpoints::{
    build_checkpoint_list, find_next_checkpoint, find_previous_checkpoint, resolve_position_at,
    Checkpoint, PositionAt, RESYNC_TOLERANCE_SECONDS,
};
