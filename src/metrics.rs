//! Metrics describing the evolution of a training run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reason a training run terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// The configured target vocabulary size was reached.
    TargetReached,
    /// The pair table ran out of repeating pairs before the target.
    Exhausted,
}

/// Metrics captured for each training pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassMetrics {
    /// Sequential pass number (1-indexed).
    pub pass: usize,
    /// Occurrence count of the pair selected during the pass.
    pub best_frequency: u64,
    /// Count of distinct pairs observed during the pass.
    pub distinct_pairs: usize,
    /// Execution time for the pass.
    pub elapsed: Duration,
}

/// Aggregate metrics produced by a training run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingMetrics {
    /// Per-pass snapshots accrued during training.
    pub passes: Vec<PassMetrics>,
    /// Total duration of the run.
    pub total_duration: Duration,
    /// Reason training terminated.
    pub stop_reason: StopReason,
}

impl TrainingMetrics {
    /// Creates an empty metrics container with pre-allocated capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            passes: Vec::with_capacity(capacity),
            total_duration: Duration::ZERO,
            stop_reason: StopReason::TargetReached,
        }
    }
}
