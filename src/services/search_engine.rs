//! Strategy-agnostic driver for population-based searches.

use std::time::Instant;

use rand::rngs::StdRng;
use tracing::debug;

use crate::domain::errors::ObjectiveError;
use crate::domain::models::{SearchBounds, SearchHistory, Snapshot};
use crate::domain::ports::{Objective, SearchStrategy};
use crate::services::convergence_monitor::{ConvergenceDecision, ConvergenceMonitor};

/// Runs a [`SearchStrategy`] against an [`Objective`] for a bounded number of
/// iterations, recording the best-so-far snapshot of every iteration.
///
/// The engine owns everything but the population update: evaluation, best
/// tracking, the per-iteration callback and the stopping decision.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    n_agents: usize,
    bounds: SearchBounds,
    n_iterations: usize,
    early_stopping: Option<(usize, f64)>,
    seed_points: Vec<Vec<f64>>,
}

impl SearchEngine {
    pub const fn new(n_agents: usize, bounds: SearchBounds, n_iterations: usize) -> Self {
        Self {
            n_agents,
            bounds,
            n_iterations,
            early_stopping: None,
            seed_points: Vec::new(),
        }
    }

    /// Stop once the best fitness has not improved by more than `delta` for
    /// `patience` consecutive iterations.
    #[must_use]
    pub const fn with_early_stopping(mut self, patience: usize, delta: f64) -> Self {
        self.early_stopping = Some((patience, delta));
        self
    }

    /// Replace the first agents of the initial population with these points.
    #[must_use]
    pub fn with_seed_points(mut self, points: Vec<Vec<f64>>) -> Self {
        self.seed_points = points;
        self
    }

    pub const fn bounds(&self) -> &SearchBounds {
        &self.bounds
    }

    fn monitor(&self) -> ConvergenceMonitor {
        match self.early_stopping {
            Some((patience, delta)) => ConvergenceMonitor::new(patience, delta, self.n_iterations),
            None => ConvergenceMonitor::without_early_stopping(self.n_iterations),
        }
    }

    /// Run one search. `on_iteration` is invoked exactly once per executed
    /// iteration with the 1-based iteration number and the best-so-far snapshot.
    ///
    /// Any objective failure aborts the run; it is never skipped or retried.
    pub fn run<O, F>(
        &self,
        strategy: &mut dyn SearchStrategy,
        objective: &O,
        rng: &mut StdRng,
        mut on_iteration: F,
    ) -> Result<SearchHistory, ObjectiveError>
    where
        O: Objective + ?Sized,
        F: FnMut(usize, &Snapshot),
    {
        let started = Instant::now();
        let mut monitor = self.monitor();
        let mut history = SearchHistory::with_capacity(self.n_iterations);

        let mut population = strategy.initialize(self.n_agents, &self.bounds, rng);
        for (agent, seed) in population.iter_mut().zip(&self.seed_points) {
            *agent = seed.iter().map(|&x| self.bounds.clamp(x)).collect();
        }

        let mut best = Snapshot {
            best_point: Vec::new(),
            best_fitness: f64::INFINITY,
        };

        loop {
            let fitness = population
                .iter()
                .map(|position| objective.evaluate(position))
                .collect::<Result<Vec<f64>, _>>()?;

            if let Some((idx, &value)) = fitness
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
            {
                if value < best.best_fitness {
                    best = Snapshot {
                        best_point: population[idx].clone(),
                        best_fitness: value,
                    };
                }
            }

            history.record(best.clone());
            on_iteration(history.len(), &best);

            if let ConvergenceDecision::Stop(reason) = monitor.observe(best.best_fitness) {
                history.finish(reason, started.elapsed());
                debug!(
                    strategy = strategy.name(),
                    iterations = history.len(),
                    best_fitness = best.best_fitness,
                    ?reason,
                    "search finished"
                );
                return Ok(history);
            }

            population = strategy.step(&population, &fitness, &self.bounds, rng);
        }
    }
}
