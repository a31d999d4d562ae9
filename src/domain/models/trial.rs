use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::SearchHistory;
use super::hypercomplex::HypercomplexPoint;
use crate::domain::errors::ObjectiveError;

/// Outcome of one successful trial: both stage histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub id: Uuid,
    pub trial_id: usize,
    pub benchmark: String,
    pub n_vars: usize,
    pub n_hyper_dims: usize,
    /// Main hypercomplex search at `p = 2`
    pub stage1_history: SearchHistory,
    /// One-dimensional search over the projection order
    pub stage2_history: SearchHistory,
}

impl TrialResult {
    pub fn stage1_best_fitness(&self) -> Option<f64> {
        self.stage1_history.best_fitness()
    }

    pub fn stage2_best_fitness(&self) -> Option<f64> {
        self.stage2_history.best_fitness()
    }

    /// Best projection order found by the fine-tune search.
    pub fn best_p(&self) -> Option<f64> {
        self.stage2_history
            .best()
            .and_then(|s| s.best_point.first().copied())
    }

    /// Stage-1 optimum `z*` reshaped into hypercomplex rows.
    pub fn best_point(&self) -> Option<Result<HypercomplexPoint, ObjectiveError>> {
        self.stage1_history.best().map(|s| {
            HypercomplexPoint::from_flat(s.best_point.clone(), self.n_vars, self.n_hyper_dims)
        })
    }
}

/// A trial that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialFailure {
    pub trial_id: usize,
    pub reason: String,
}

/// Everything an experiment produced: successes, failures and artifacts.
///
/// Results are a set; their order says nothing about dispatch order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub benchmark: String,
    pub n_runs: usize,
    pub workers: usize,
    pub results: Vec<TrialResult>,
    pub failures: Vec<TrialFailure>,
    pub artifacts: Vec<PathBuf>,
    pub persistence_errors: Vec<String>,
}

impl ExperimentReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.results.len() == self.n_runs
    }

    pub fn success_rate(&self) -> f64 {
        if self.n_runs == 0 {
            return 0.0;
        }
        self.results.len() as f64 / self.n_runs as f64
    }
}
