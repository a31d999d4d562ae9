//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::collections::HashMap;

use lio::domain::models::{
    BenchmarkFunction, FineTuneConfig, ProgressKind, ProgressMessage, SearchConfig, StrategyKind,
};
use lio::domain::ports::ProgressSink;
use lio::services::TrialRunner;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A stage-1 configuration small enough for fast tests.
pub fn small_search(benchmark: &BenchmarkFunction, n_iterations: usize) -> SearchConfig {
    SearchConfig {
        n_agents: 8,
        n_vars: 3,
        n_hyper_dims: 4,
        n_iterations,
        lower_bound: benchmark.lower_bound,
        upper_bound: benchmark.upper_bound,
        patience: 10,
        delta: 1e-5,
    }
}

/// Runner with a tiny fine-tune stage.
pub fn quick_runner(seed: Option<u64>) -> TrialRunner {
    TrialRunner::new(
        StrategyKind::Pso,
        FineTuneConfig {
            n_agents: 4,
            n_iterations: 5,
            ..Default::default()
        },
    )
    .with_seed(seed)
}

/// Records every message and checks per-trial ordering as it goes.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<ProgressMessage>,
    pub violations: Vec<String>,
    pub finished_calls: usize,
    last_kind: HashMap<usize, ProgressKind>,
}

impl RecordingSink {
    pub fn sentinels(&self) -> HashMap<usize, usize> {
        let mut counts = HashMap::new();
        for message in self.messages.iter().filter(|m| m.is_sentinel()) {
            *counts.entry(message.trial_id).or_insert(0) += 1;
        }
        counts
    }

    pub fn iterations(&self, trial_id: usize) -> usize {
        self.messages
            .iter()
            .filter(|m| m.trial_id == trial_id && m.kind() == ProgressKind::Iteration)
            .count()
    }
}

impl ProgressSink for RecordingSink {
    fn on_message(&mut self, message: &ProgressMessage) {
        let kind = message.kind();
        if let Some(previous) = self.last_kind.insert(message.trial_id, kind) {
            let allowed = match previous {
                ProgressKind::Iteration => true,
                ProgressKind::Completion => kind == ProgressKind::Sentinel,
                ProgressKind::Sentinel => false,
            };
            if !allowed {
                self.violations.push(format!(
                    "trial {}: {kind:?} after {previous:?}",
                    message.trial_id
                ));
            }
        }
        self.messages.push(*message);
    }

    fn on_finished(&mut self) {
        self.finished_calls += 1;
    }
}
