//! Frame guard
//!
//! Wraps per-frame analysis so one bad frame never stops the loop. Errors
//! are swallowed and counted; after [`DEGRADED_THRESHOLD`] in a row the
//! guard reports degraded analysis until a frame succeeds again.

use crate::error::AnalysisError;

/// Consecutive failures before analysis is reported as degraded
pub const DEGRADED_THRESHOLD: u32 = 5;

/// The one user-facing notice the analysis core produces
pub const DEGRADED_MESSAGE: &str =
    "Form analysis is having trouble with this video. Counts and feedback may be incomplete.";

#[derive(Clone, Debug, Default)]
pub struct FrameGuard {
    consecutive_errors: u32,
    total_errors: u64,
}

impl FrameGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame outcome. Failures become `None`: the frame is skipped.
    pub fn record<T>(&mut self, outcome: Result<T, AnalysisError>) -> Option<T> {
        match outcome {
            Ok(value) => {
                if self.consecutive_errors >= DEGRADED_THRESHOLD {
                    log::info!(
                        "analysis recovered after {} failed frames",
                        self.consecutive_errors
                    );
                }
                self.consecutive_errors = 0;
                Some(value)
            }
            Err(err) => {
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                self.total_errors += 1;
                log::debug!("frame skipped ({} in a row): {}", self.consecutive_errors, err);
                if self.consecutive_errors == DEGRADED_THRESHOLD {
                    log::warn!(
                        "{} consecutive frames failed, analysis degraded",
                        DEGRADED_THRESHOLD
                    );
                }
                None
            }
        }
    }

    pub fn run<T>(&mut self, f: impl FnOnce() -> Result<T, AnalysisError>) -> Option<T> {
        self.record(f())
    }

    pub fn is_degraded(&self) -> bool {
        self.consecutive_errors >= DEGRADED_THRESHOLD
    }

    /// Notice to show, only while degraded
    pub fn message(&self) -> Option<&'static str> {
        self.is_degraded().then_some(DEGRADED_MESSAGE)
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
