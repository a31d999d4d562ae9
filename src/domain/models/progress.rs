use serde::{Deserialize, Serialize};

/// One message on the progress channel.
///
/// Per trial the stream is: zero or more iteration messages (`fitness` only),
/// at most one completion message (all three fields), then exactly one
/// sentinel (all fields `None`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub trial_id: usize,
    pub fitness: Option<f64>,
    pub fine_fitness: Option<f64>,
    pub fine_p: Option<f64>,
}

/// Shape of a [`ProgressMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    Iteration,
    Completion,
    Sentinel,
}

impl ProgressMessage {
    pub const fn iteration(trial_id: usize, fitness: f64) -> Self {
        Self {
            trial_id,
            fitness: Some(fitness),
            fine_fitness: None,
            fine_p: None,
        }
    }

    pub const fn completion(trial_id: usize, fitness: f64, fine_fitness: f64, fine_p: f64) -> Self {
        Self {
            trial_id,
            fitness: Some(fitness),
            fine_fitness: Some(fine_fitness),
            fine_p: Some(fine_p),
        }
    }

    pub const fn sentinel(trial_id: usize) -> Self {
        Self {
            trial_id,
            fitness: None,
            fine_fitness: None,
            fine_p: None,
        }
    }

    pub const fn kind(&self) -> ProgressKind {
        match (self.fitness, self.fine_fitness) {
            (None, _) => ProgressKind::Sentinel,
            (Some(_), None) => ProgressKind::Iteration,
            (Some(_), Some(_)) => ProgressKind::Completion,
        }
    }

    pub const fn is_sentinel(&self) -> bool {
        self.fitness.is_none()
    }
}
