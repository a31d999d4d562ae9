//! One trial: stage-1 hypercomplex search followed by the stage-2
//! projection-order search.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::strategies::build_strategy;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    BenchmarkFunction, FineTuneConfig, HypercomplexPoint, ProjectionOrder, SearchBounds,
    SearchConfig, StrategyKind, TrialResult,
};
use crate::services::progress::ProgressReporter;
use crate::services::projection::{HypercomplexObjective, ProjectionOrderObjective};
use crate::services::search_engine::SearchEngine;

/// Executes trials. Cheap to clone; every worker gets its own copy.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    stage1_strategy: StrategyKind,
    fine_tune: FineTuneConfig,
    seed: Option<u64>,
}

impl Default for TrialRunner {
    fn default() -> Self {
        Self::new(StrategyKind::Pso, FineTuneConfig::default())
    }
}

impl TrialRunner {
    pub const fn new(stage1_strategy: StrategyKind, fine_tune: FineTuneConfig) -> Self {
        Self {
            stage1_strategy,
            fine_tune,
            seed: None,
        }
    }

    /// Derive each trial's seed from `seed + trial_id` instead of OS entropy.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub const fn fine_tune(&self) -> &FineTuneConfig {
        &self.fine_tune
    }

    fn rng_for(&self, trial_id: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(trial_id as u64)),
            None => StdRng::from_entropy(),
        }
    }

    /// Run both stages for one trial.
    ///
    /// The reporter is consumed: its sentinel goes out when this returns,
    /// whether the trial succeeded, failed or panicked.
    pub fn execute(
        &self,
        trial_id: usize,
        benchmark: &BenchmarkFunction,
        search: &SearchConfig,
        mut reporter: ProgressReporter,
    ) -> DomainResult<TrialResult> {
        let mut rng = self.rng_for(trial_id);
        let objective_error = |source| DomainError::objective(benchmark.name, source);
        let domain = (search.lower_bound, search.upper_bound);

        // Stage 1: search the hypercomplex unit cube at p = 2
        let stage1_objective = HypercomplexObjective::new(
            *benchmark,
            search.n_vars,
            search.n_hyper_dims,
            domain,
            ProjectionOrder::EUCLIDEAN,
        );
        let stage1 = SearchEngine::new(
            search.n_agents,
            SearchBounds::unit(search.dimensionality()),
            search.n_iterations,
        )
        .with_early_stopping(search.patience, search.delta);
        let mut strategy = build_strategy(self.stage1_strategy);

        let stage1_history = stage1
            .run(strategy.as_mut(), &stage1_objective, &mut rng, |_, snapshot| {
                reporter.iteration(snapshot.best_fitness);
            })
            .map_err(objective_error)?;

        let Some(stage1_best) = stage1_history.best() else {
            return Err(DomainError::TrialFailed {
                trial_id,
                reason: "stage 1 recorded no iterations".into(),
            });
        };
        let z_star = HypercomplexPoint::from_flat(
            stage1_best.best_point.clone(),
            search.n_vars,
            search.n_hyper_dims,
        )
        .map_err(objective_error)?;
        let stage1_fitness = stage1_best.best_fitness;
        debug!(
            trial_id,
            iterations = stage1_history.len(),
            fitness = stage1_fitness,
            "stage 1 finished"
        );

        // Stage 2: tune p for the fixed z*, starting from the stage-1 order
        let stage2_objective = ProjectionOrderObjective::new(*benchmark, &z_star, domain);
        let stage2 = SearchEngine::new(
            self.fine_tune.n_agents,
            SearchBounds::new(1, self.fine_tune.p_lower, self.fine_tune.p_upper),
            self.fine_tune.n_iterations,
        )
        .with_seed_points(vec![vec![ProjectionOrder::EUCLIDEAN.value()]]);
        let mut fine_strategy = build_strategy(self.fine_tune.strategy);

        let stage2_history = stage2
            .run(fine_strategy.as_mut(), &stage2_objective, &mut rng, |_, _| {})
            .map_err(objective_error)?;

        let (fine_fitness, fine_p) = stage2_history
            .best()
            .and_then(|s| s.best_point.first().map(|&p| (s.best_fitness, p)))
            .ok_or_else(|| DomainError::TrialFailed {
                trial_id,
                reason: "stage 2 recorded no iterations".into(),
            })?;

        reporter.completion(stage1_fitness, fine_fitness, fine_p);
        reporter.finish();

        info!(
            trial_id,
            benchmark = benchmark.name,
            fitness = stage1_fitness,
            fine_fitness,
            fine_p,
            "trial finished"
        );

        Ok(TrialResult {
            id: Uuid::new_v4(),
            trial_id,
            benchmark: benchmark.name.to_string(),
            n_vars: search.n_vars,
            n_hyper_dims: search.n_hyper_dims,
            stage1_history,
            stage2_history,
        })
    }
}
