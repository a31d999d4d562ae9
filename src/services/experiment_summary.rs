//! Aggregate statistics over a finished experiment.

use serde::Serialize;

use crate::domain::models::{ExperimentReport, SearchHistory};

/// Mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

impl MeanStd {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: variance.sqrt(),
        })
    }
}

/// Best-fitness and timing statistics of one stage across trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageStats {
    pub fitness: MeanStd,
    pub min_fitness: f64,
    pub max_fitness: f64,
    pub elapsed_secs: MeanStd,
    pub mean_iterations: f64,
}

impl StageStats {
    fn from_histories<'a>(histories: impl Iterator<Item = &'a SearchHistory>) -> Option<Self> {
        let mut fitness = Vec::new();
        let mut elapsed = Vec::new();
        let mut iterations = Vec::new();
        for history in histories {
            if let Some(best) = history.best_fitness() {
                fitness.push(best);
                elapsed.push(history.elapsed().as_secs_f64());
                iterations.push(history.len() as f64);
            }
        }

        Some(Self {
            fitness: MeanStd::of(&fitness)?,
            min_fitness: fitness.iter().copied().fold(f64::INFINITY, f64::min),
            max_fitness: fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            elapsed_secs: MeanStd::of(&elapsed)?,
            mean_iterations: MeanStd::of(&iterations)?.mean,
        })
    }
}

/// Summary of an [`ExperimentReport`], suitable for a table or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentSummary {
    pub benchmark: String,
    pub n_runs: usize,
    pub workers: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Hypercomplex search at `p = 2`
    pub stage1: Option<StageStats>,
    /// Projection-order fine-tune
    pub stage2: Option<StageStats>,
    pub best_p: Option<MeanStd>,
    pub artifacts: usize,
}

impl ExperimentSummary {
    pub fn from_report(report: &ExperimentReport) -> Self {
        let best_p: Vec<f64> = report.results.iter().filter_map(|r| r.best_p()).collect();

        Self {
            benchmark: report.benchmark.clone(),
            n_runs: report.n_runs,
            workers: report.workers,
            succeeded: report.results.len(),
            failed: report.failures.len(),
            stage1: StageStats::from_histories(report.results.iter().map(|r| &r.stage1_history)),
            stage2: StageStats::from_histories(report.results.iter().map(|r| &r.stage2_history)),
            best_p: MeanStd::of(&best_p),
            artifacts: report.artifacts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Snapshot, StopReason, TrialFailure, TrialResult};
    use std::time::Duration;
    use uuid::Uuid;

    fn history(fitness: &[f64], point: f64, secs: u64) -> SearchHistory {
        let mut history = SearchHistory::with_capacity(fitness.len());
        for &f in fitness {
            history.record(Snapshot {
                best_point: vec![point],
                best_fitness: f,
            });
        }
        history.finish(StopReason::MaxIterations, Duration::from_secs(secs));
        history
    }

    fn result(trial_id: usize, stage1: f64, stage2: f64, p: f64) -> TrialResult {
        TrialResult {
            id: Uuid::new_v4(),
            trial_id,
            benchmark: "sphere".into(),
            n_vars: 1,
            n_hyper_dims: 1,
            stage1_history: history(&[stage1 + 1.0, stage1], 0.5, 2),
            stage2_history: history(&[stage2], p, 1),
        }
    }

    #[test]
    fn test_summary_statistics() {
        let report = ExperimentReport {
            benchmark: "sphere".into(),
            n_runs: 3,
            workers: 2,
            results: vec![result(0, 2.0, 1.0, 2.0), result(1, 4.0, 3.0, 4.0)],
            failures: vec![TrialFailure {
                trial_id: 2,
                reason: "boom".into(),
            }],
            ..Default::default()
        };

        let summary = ExperimentSummary::from_report(&report);

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        let stage1 = summary.stage1.unwrap();
        assert!((stage1.fitness.mean - 3.0).abs() < 1e-12);
        assert!((stage1.fitness.std - 1.0).abs() < 1e-12);
        assert!((stage1.min_fitness - 2.0).abs() < f64::EPSILON);
        assert!((stage1.max_fitness - 4.0).abs() < f64::EPSILON);
        assert!((stage1.elapsed_secs.mean - 2.0).abs() < 1e-12);
        assert!((stage1.mean_iterations - 2.0).abs() < 1e-12);
        let p = summary.best_p.unwrap();
        assert!((p.mean - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_report_has_no_stats() {
        let summary = ExperimentSummary::from_report(&ExperimentReport::default());
        assert!(summary.stage1.is_none());
        assert!(summary.best_p.is_none());
    }
}
