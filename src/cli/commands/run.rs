//! Implementation of the `lio run` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::adapters::benchmarks;
use crate::adapters::storage::JsonFileStore;
use crate::cli::output::table::TrialRow;
use crate::cli::output::{output, CommandOutput, MultiProgressManager, TableFormatter, TrialProgressBars};
use crate::domain::models::{ExperimentReport, TrialFailure};
use crate::domain::ports::{NullProgressSink, ProgressSink};
use crate::infrastructure::config::{ConfigLoader, ConfigOverrides};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::{ExperimentOrchestrator, ExperimentSummary, TrialRunner};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Benchmark function to optimize (see `lio benchmarks`)
    #[arg(long = "fn", value_name = "NAME")]
    pub function: Option<String>,

    /// Number of stage-1 agents
    #[arg(long)]
    pub n_agents: Option<usize>,

    /// Number of decision variables
    #[arg(long)]
    pub n_vars: Option<usize>,

    /// Stage-1 iteration budget (defaults to 2000 x n_vars)
    #[arg(long = "n-iters")]
    pub n_iters: Option<usize>,

    /// Number of independent trials
    #[arg(long)]
    pub n_runs: Option<usize>,

    /// Directory receiving one JSON file per trial
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base seed; trial i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upper bound on concurrently running trials
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Abort when no progress arrives for this many seconds
    #[arg(long)]
    pub watchdog_secs: Option<u64>,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            benchmark: self.function.clone(),
            n_agents: self.n_agents,
            n_vars: self.n_vars,
            n_iterations: self.n_iters,
            n_runs: self.n_runs,
            max_workers: self.max_workers,
            seed: self.seed,
            watchdog_secs: self.watchdog_secs,
            output_dir: self.output.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub summary: ExperimentSummary,
    pub trials: Vec<TrialRow>,
    pub failures: Vec<TrialFailure>,
    pub artifacts: Vec<PathBuf>,
    pub persistence_errors: Vec<String>,
}

impl RunOutput {
    pub fn from_report(report: &ExperimentReport) -> Self {
        let mut trials: Vec<TrialRow> = report
            .results
            .iter()
            .filter_map(|r| {
                Some(TrialRow {
                    trial_id: r.trial_id,
                    stage1_fitness: r.stage1_best_fitness()?,
                    stage2_fitness: r.stage2_best_fitness()?,
                    best_p: r.best_p()?,
                    stage1_iterations: r.stage1_history.len(),
                })
            })
            .collect();
        trials.sort_by_key(|t| t.trial_id);

        Self {
            summary: ExperimentSummary::from_report(report),
            trials,
            failures: report.failures.clone(),
            artifacts: report.artifacts.clone(),
            persistence_errors: report.persistence_errors.clone(),
        }
    }
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut sections = vec![formatter.format_summary(&self.summary)];
        if !self.trials.is_empty() {
            sections.push(formatter.format_trials(&self.trials));
        }
        if !self.failures.is_empty() {
            sections.push(format!("Failed trials:\n{}", formatter.format_failures(&self.failures)));
        }
        if let Some(dir) = self.artifacts.first().and_then(|p| p.parent()) {
            sections.push(format!("{} result file(s) written to {}", self.artifacts.len(), dir.display()));
        }
        for error in &self.persistence_errors {
            sections.push(format!("! {error}"));
        }
        sections.join("\n\n")
    }
}

pub async fn execute(args: RunArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(args.config.as_deref(), &args.overrides())
        .context("Failed to load experiment configuration")?;
    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;

    let benchmark = benchmarks::get(&config.benchmark)?;
    let search = config.search_config(&benchmark);

    let runner = TrialRunner::new(config.stage1_strategy, config.fine_tune.clone()).with_seed(config.seed);
    let mut orchestrator = ExperimentOrchestrator::new(runner)
        .with_max_workers(config.max_workers)
        .with_watchdog(config.watchdog_secs.map(Duration::from_secs));
    if let Some(dir) = &config.output_dir {
        // results/<benchmark>/<n_vars>/
        let dir = dir.join(benchmark.name).join(search.n_vars.to_string());
        info!(dir = %dir.display(), "persisting trial results");
        orchestrator = orchestrator.with_store(Arc::new(JsonFileStore::new(dir)));
    }

    let mut sink: Box<dyn ProgressSink> = if json_mode {
        Box::new(NullProgressSink)
    } else {
        Box::new(TrialProgressBars::new(
            MultiProgressManager::new(),
            config.n_runs,
            search.n_iterations,
        ))
    };

    let report = orchestrator
        .run_experiment(&benchmark, &search, config.n_runs, sink.as_mut())
        .await
        .context("Experiment aborted")?;

    output(&RunOutput::from_report(&report), json_mode);

    if report.results.is_empty() {
        anyhow::bail!("all {} trial(s) failed", report.n_runs);
    }
    Ok(())
}
