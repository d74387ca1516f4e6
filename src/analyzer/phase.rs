//! Phase sets and per-phase peak storage
//!
//! Each exercise declares a closed enum of phases. Peaks for the rep in
//! progress live in a fixed slot per phase, so "no peak yet" is an explicit
//! `None` rather than a missing key.

use std::fmt;
use std::marker::PhantomData;

use crate::physics::Skeleton;

/// A closed, cyclic set of movement phases
pub trait Phase: Copy + Eq + fmt::Debug + 'static {
    /// Every phase in cycle order
    const ALL: &'static [Self];

    /// Position in [`Phase::ALL`]
    fn index(self) -> usize;

    fn name(self) -> &'static str;
}

/// Best frame seen for one phase of the rep in progress
#[derive(Clone, Debug)]
pub struct PhasePeak<M> {
    pub skeleton: Skeleton,
    pub timestamp_ms: f64,
    pub video_time: Option<f64>,
    pub measurements: M,
    /// Exercise-defined selection score, higher wins
    pub score: f64,
    pub thumbnail: Option<String>,
}

/// One optional peak per phase
#[derive(Clone, Debug)]
pub struct PeakMap<P: Phase, M> {
    slots: Vec<Option<PhasePeak<M>>>,
    _phase: PhantomData<P>,
}

impl<P: Phase, M> PeakMap<P, M> {
    pub fn new() -> Self {
        Self {
            slots: (0..P::ALL.len()).map(|_| None).collect(),
            _phase: PhantomData,
        }
    }

    pub fn get(&self, phase: P) -> Option<&PhasePeak<M>> {
        self.slots.get(phase.index()).and_then(Option::as_ref)
    }

    /// Would a frame scoring `score` replace the current holder for `phase`
    pub fn accepts(&self, phase: P, score: f64) -> bool {
        match self.slots.get(phase.index()) {
            Some(slot) => slot.as_ref().map_or(true, |held| score > held.score),
            None => false,
        }
    }

    /// Store `peak` for `phase` if it beats the current holder.
    /// Returns whether it was stored.
    pub fn offer(&mut self, phase: P, peak: PhasePeak<M>) -> bool {
        if !self.accepts(phase, peak.score) {
            return false;
        }
        if let Some(slot) = self.slots.get_mut(phase.index()) {
            *slot = Some(peak);
        }
        true
    }

    /// Drop the peak held for `phase`, if any
    pub fn discard(&mut self, phase: P) -> Option<PhasePeak<M>> {
        self.slots.get_mut(phase.index())?.take()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Empty the map, yielding captured peaks in cycle order
    pub fn drain(&mut self) -> Vec<(P, PhasePeak<M>)> {
        P::ALL
            .iter()
            .filter_map(|&phase| {
                let peak = self.slots.get_mut(phase.index())?.take()?;
                Some((phase, peak))
            })
            .collect()
    }
}

impl<P: Phase, M> Default for PeakMap<P, M> {
    fn default() -> Self {
        Self::new()
    }
}
