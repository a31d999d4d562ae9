//! Patience-based early stopping for minimization searches.

use crate::domain::models::StopReason;

/// Decision returned after each observed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceDecision {
    Continue,
    Stop(StopReason),
}

/// Tracks the best fitness seen so far and counts consecutive iterations
/// that failed to improve on it by more than `delta`.
///
/// One monitor serves exactly one search run. The search stops once the
/// stale counter reaches `patience`, so `patience == 0` stops after the first
/// iteration. The iteration budget always applies.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    patience: Option<usize>,
    delta: f64,
    max_iterations: usize,
    best_so_far: f64,
    stale_iterations: usize,
    iterations: usize,
}

impl ConvergenceMonitor {
    pub const fn new(patience: usize, delta: f64, max_iterations: usize) -> Self {
        Self {
            patience: Some(patience),
            delta,
            max_iterations,
            best_so_far: f64::INFINITY,
            stale_iterations: 0,
            iterations: 0,
        }
    }

    /// Monitor that only enforces the iteration budget.
    pub const fn without_early_stopping(max_iterations: usize) -> Self {
        Self {
            patience: None,
            delta: 0.0,
            max_iterations,
            best_so_far: f64::INFINITY,
            stale_iterations: 0,
            iterations: 0,
        }
    }

    /// Record the best fitness of the iteration that just finished.
    pub fn observe(&mut self, fitness: f64) -> ConvergenceDecision {
        self.iterations += 1;

        if self.best_so_far - fitness > self.delta {
            self.best_so_far = fitness;
            self.stale_iterations = 0;
        } else {
            self.stale_iterations += 1;
        }

        if self
            .patience
            .is_some_and(|patience| self.stale_iterations >= patience)
        {
            ConvergenceDecision::Stop(StopReason::EarlyStopped)
        } else if self.iterations >= self.max_iterations {
            ConvergenceDecision::Stop(StopReason::MaxIterations)
        } else {
            ConvergenceDecision::Continue
        }
    }

    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    pub const fn stale_iterations(&self) -> usize {
        self.stale_iterations
    }

    pub const fn best_so_far(&self) -> f64 {
        self.best_so_far
    }
}
