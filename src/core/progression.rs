//! Per-action loop progression tracked through a simulation pass.

use serde::{Deserialize, Serialize};

/// Progress of one loop action.
///
/// `completed` counts segments and only grows by whole loops; `total` counts
/// loops, seeded from the host's history the first time the action appears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Progress accumulated inside the current loop.
    pub progress: f64,
    pub completed: u64,
    pub total: u64,
}

impl Progression {
    pub fn seeded(historical_total: u64) -> Self {
        Self {
            progress: 0.0,
            completed: 0,
            total: historical_total,
        }
    }

    /// Closes the current loop of `segments` segments.
    pub fn complete_loop(&mut self, segments: u32) {
        self.progress = 0.0;
        self.completed += segments as u64;
        self.total += 1;
    }

    /// Absolute index of `segment` (relative to the current loop) across all loops.
    pub fn absolute_segment(&self, segment: u64) -> u64 {
        self.completed + segment
    }
}
