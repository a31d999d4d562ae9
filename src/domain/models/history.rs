use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured iteration budget was exhausted.
    MaxIterations,
    /// The best fitness failed to improve by more than `delta` for `patience` iterations.
    EarlyStopped,
}

/// Best point and fitness known at the end of one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub best_point: Vec<f64>,
    pub best_fitness: f64,
}

/// Per-iteration record of a single search run.
///
/// Append-only while the engine runs; [`SearchHistory::finish`] seals it.
/// The last snapshot is the authoritative best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistory {
    snapshots: Vec<Snapshot>,
    elapsed: Duration,
    stop_reason: Option<StopReason>,
}

impl SearchHistory {
    pub fn with_capacity(iterations: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(iterations),
            elapsed: Duration::ZERO,
            stop_reason: None,
        }
    }

    pub(crate) fn record(&mut self, snapshot: Snapshot) {
        debug_assert!(self.stop_reason.is_none(), "history already sealed");
        self.snapshots.push(snapshot);
    }

    pub(crate) fn finish(&mut self, reason: StopReason, elapsed: Duration) {
        self.stop_reason = Some(reason);
        self.elapsed = elapsed;
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of iterations actually executed.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn best(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best().map(|s| s.best_fitness)
    }

    pub fn fitness_trace(&self) -> impl Iterator<Item = f64> + '_ {
        self.snapshots.iter().map(|s| s.best_fitness)
    }

    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub const fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }
}
