//! Progress protocol: per-trial producer handle and consumer-side demultiplexer.
//!
//! Trials share one unbounded many-producer channel. Each trial owns exactly
//! one [`ProgressReporter`]; dropping it emits the trial's sentinel, so the
//! sentinel is always the last message of a trial and is sent exactly once,
//! even when the trial errors out or panics.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ProgressKind, ProgressMessage};

/// Producer half of the progress protocol for a single trial.
#[derive(Debug)]
pub struct ProgressReporter {
    trial_id: usize,
    tx: UnboundedSender<ProgressMessage>,
    completed: bool,
}

impl ProgressReporter {
    pub fn new(trial_id: usize, tx: UnboundedSender<ProgressMessage>) -> Self {
        Self {
            trial_id,
            tx,
            completed: false,
        }
    }

    pub const fn trial_id(&self) -> usize {
        self.trial_id
    }

    /// Report the stage-1 best fitness after one iteration.
    pub fn iteration(&self, fitness: f64) {
        debug_assert!(!self.completed, "iteration reported after completion");
        self.send(ProgressMessage::iteration(self.trial_id, fitness));
    }

    /// Report the final stage-1 and stage-2 results. Sent at most once.
    pub fn completion(&mut self, fitness: f64, fine_fitness: f64, fine_p: f64) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.send(ProgressMessage::completion(
            self.trial_id,
            fitness,
            fine_fitness,
            fine_p,
        ));
    }

    /// Close this trial's stream by emitting the sentinel.
    pub fn finish(self) {
        drop(self);
    }

    fn send(&self, message: ProgressMessage) {
        // Unbounded send never blocks; it only fails once the consumer is gone.
        if self.tx.send(message).is_err() {
            trace!(trial_id = self.trial_id, "progress consumer dropped");
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.send(ProgressMessage::sentinel(self.trial_id));
    }
}

/// Consumer-side view of one trial's stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialProgress {
    pub iterations: usize,
    pub fitness: Option<f64>,
    pub fine_fitness: Option<f64>,
    pub fine_p: Option<f64>,
    pub finished: bool,
}

/// Demultiplexes the interleaved stream by `trial_id` and enforces the
/// per-trial ordering: iterations, then at most one completion, then one
/// sentinel.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    expected: usize,
    trials: HashMap<usize, TrialProgress>,
    finished: usize,
}

impl ProgressTracker {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            trials: HashMap::with_capacity(expected),
            finished: 0,
        }
    }

    pub fn accept(&mut self, message: &ProgressMessage) -> DomainResult<()> {
        if message.trial_id >= self.expected {
            return Err(DomainError::ProtocolViolation(format!(
                "message for unknown trial {} (expected {} trials)",
                message.trial_id, self.expected
            )));
        }

        let state = self.trials.entry(message.trial_id).or_default();
        if state.finished {
            return Err(DomainError::ProtocolViolation(format!(
                "trial {} sent a message after its sentinel",
                message.trial_id
            )));
        }

        match message.kind() {
            ProgressKind::Iteration => {
                if state.fine_fitness.is_some() {
                    return Err(DomainError::ProtocolViolation(format!(
                        "trial {} reported an iteration after completing",
                        message.trial_id
                    )));
                }
                state.iterations += 1;
                state.fitness = message.fitness;
            }
            ProgressKind::Completion => {
                if state.fine_fitness.is_some() {
                    return Err(DomainError::ProtocolViolation(format!(
                        "trial {} completed twice",
                        message.trial_id
                    )));
                }
                state.fitness = message.fitness;
                state.fine_fitness = message.fine_fitness;
                state.fine_p = message.fine_p;
            }
            ProgressKind::Sentinel => {
                state.finished = true;
                self.finished += 1;
            }
        }
        Ok(())
    }

    pub const fn is_done(&self) -> bool {
        self.finished >= self.expected
    }

    pub const fn finished(&self) -> usize {
        self.finished
    }

    pub const fn missing(&self) -> usize {
        self.expected.saturating_sub(self.finished)
    }

    pub fn trial(&self, trial_id: usize) -> Option<&TrialProgress> {
        self.trials.get(&trial_id)
    }
}
