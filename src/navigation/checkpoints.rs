//! Checkpoint index
//!
//! Flattens every captured rep position into one chronological list so the
//! player can step between them. The list is always rebuilt from the
//! positions; it is never stored on its own.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::RepPosition;

/// Slack for frame-quantized seek times when resolving the current position
pub const RESYNC_TOLERANCE_SECONDS: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub rep_num: u32,
    pub position: String,
    pub video_time: f64,
}

/// Rep and phase shown for a playback time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAt {
    pub rep_num: u32,
    pub position: Option<String>,
}

/// Sort by video time, then rep, then phase order
///
/// Positions captured without a video time cannot be navigated to and are
/// left out. Phases missing from `phase_order` sort after the known ones.
pub fn build_checkpoint_list(
    positions_by_rep: &BTreeMap<u32, Vec<RepPosition>>,
    phase_order: &[&str],
) -> Vec<Checkpoint> {
    let rank = |name: &str| {
        phase_order
            .iter()
            .position(|p| *p == name)
            .unwrap_or(phase_order.len())
    };

    let mut list: Vec<Checkpoint> = positions_by_rep
        .iter()
        .flat_map(|(&rep_num, positions)| {
            positions.iter().filter_map(move |pos| {
                let video_time = pos.video_time.filter(|t| t.is_finite())?;
                Some(Checkpoint {
                    rep_num,
                    position: pos.name.to_string(),
                    video_time,
                })
            })
        })
        .collect();

    list.sort_by(|a, b| {
        a.video_time
            .total_cmp(&b.video_time)
            .then(a.rep_num.cmp(&b.rep_num))
            .then_with(|| rank(&a.position).cmp(&rank(&b.position)))
    });
    list
}

/// Last checkpoint strictly before `current_time`
pub fn find_previous_checkpoint(list: &[Checkpoint], current_time: f64) -> Option<&Checkpoint> {
    list.iter()
        .rev()
        .find(|c| c.video_time.partial_cmp(&current_time) == Some(Ordering::Less))
}

/// First checkpoint strictly after `current_time`
pub fn find_next_checkpoint(list: &[Checkpoint], current_time: f64) -> Option<&Checkpoint> {
    list.iter()
        .find(|c| c.video_time.partial_cmp(&current_time) == Some(Ordering::Greater))
}

/// Rep and phase at `time`: the last checkpoint at or before it, within
/// [`RESYNC_TOLERANCE_SECONDS`]. Before the first checkpoint this is rep 1
/// with no position.
pub fn resolve_position_at(list: &[Checkpoint], time: f64) -> PositionAt {
    list.iter()
        .take_while(|c| c.video_time <= time + RESYNC_TOLERANCE_SECONDS)
        .last()
        .map(|c| PositionAt {
            rep_num: c.rep_num,
            position: Some(c.position.clone()),
        })
        .unwrap_or(PositionAt {
            rep_num: 1,
            position: None,
        })
}
