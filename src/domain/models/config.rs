use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::benchmark::BenchmarkFunction;
use crate::domain::errors::{DomainError, DomainResult};

/// Iterations per decision variable used when `n_iterations` is left at 0.
pub const ITERATIONS_PER_VARIABLE: usize = 2000;

/// Population-search algorithm used by one stage of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Particle swarm optimization
    Pso,
    /// Black hole algorithm
    Bha,
    /// Differential evolution (DE/rand/1/bin)
    De,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pso => "pso",
            Self::Bha => "bha",
            Self::De => "de",
        };
        f.write_str(name)
    }
}

/// Size and stopping parameters of the stage-1 hypercomplex search.
///
/// Immutable for the lifetime of a trial. `lower_bound`/`upper_bound` are the
/// benchmark's domain: the interval the projection rescales into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub n_agents: usize,
    pub n_vars: usize,
    pub n_hyper_dims: usize,
    pub n_iterations: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub patience: usize,
    pub delta: f64,
}

impl SearchConfig {
    /// Number of real components the stage-1 strategy searches over.
    pub const fn dimensionality(&self) -> usize {
        self.n_vars * self.n_hyper_dims
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.n_agents == 0 {
            return Err(DomainError::InvalidConfig("n_agents must be positive".into()));
        }
        if self.n_vars == 0 {
            return Err(DomainError::InvalidConfig("n_vars must be positive".into()));
        }
        if self.n_hyper_dims == 0 {
            return Err(DomainError::InvalidConfig(
                "n_hyper_dims must be positive".into(),
            ));
        }
        if self.n_iterations == 0 {
            return Err(DomainError::InvalidConfig(
                "n_iterations must be positive".into(),
            ));
        }
        if !(self.lower_bound.is_finite()
            && self.upper_bound.is_finite()
            && self.lower_bound < self.upper_bound)
        {
            return Err(DomainError::InvalidConfig(format!(
                "bounds [{}, {}] must be finite with lower < upper",
                self.lower_bound, self.upper_bound
            )));
        }
        if !self.delta.is_finite() || self.delta < 0.0 {
            return Err(DomainError::InvalidConfig(format!(
                "delta must be a non-negative number, got {}",
                self.delta
            )));
        }
        Ok(())
    }
}

/// Parameters of the stage-2 projection-order search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FineTuneConfig {
    #[serde(default = "default_fine_tune_strategy")]
    pub strategy: StrategyKind,

    #[serde(default = "default_fine_tune_agents")]
    pub n_agents: usize,

    #[serde(default = "default_fine_tune_iterations")]
    pub n_iterations: usize,

    /// Smallest projection order explored
    #[serde(default = "default_p_lower")]
    pub p_lower: f64,

    /// Largest projection order explored
    #[serde(default = "default_p_upper")]
    pub p_upper: f64,
}

const fn default_fine_tune_strategy() -> StrategyKind {
    StrategyKind::Bha
}

const fn default_fine_tune_agents() -> usize {
    10
}

const fn default_fine_tune_iterations() -> usize {
    25
}

const fn default_p_lower() -> f64 {
    1.0
}

const fn default_p_upper() -> f64 {
    5.0
}

impl Default for FineTuneConfig {
    fn default() -> Self {
        Self {
            strategy: default_fine_tune_strategy(),
            n_agents: default_fine_tune_agents(),
            n_iterations: default_fine_tune_iterations(),
            p_lower: default_p_lower(),
            p_upper: default_p_upper(),
        }
    }
}

impl FineTuneConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.n_agents == 0 || self.n_iterations == 0 {
            return Err(DomainError::InvalidConfig(
                "fine-tune agents and iterations must be positive".into(),
            ));
        }
        if !(self.p_lower.is_finite() && self.p_upper.is_finite()) || self.p_lower <= 0.0 {
            return Err(DomainError::InvalidConfig(format!(
                "fine-tune bounds must be finite and positive, got [{}, {}]",
                self.p_lower, self.p_upper
            )));
        }
        if self.p_lower >= self.p_upper {
            return Err(DomainError::InvalidConfig(format!(
                "fine-tune p_lower ({}) must be below p_upper ({})",
                self.p_lower, self.p_upper
            )));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for JSON log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "never".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Main configuration structure for an experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExperimentConfig {
    /// Benchmark function name (see `lio benchmarks`)
    #[serde(default)]
    pub benchmark: String,

    #[serde(default = "default_n_agents")]
    pub n_agents: usize,

    #[serde(default = "default_n_vars")]
    pub n_vars: usize,

    /// Stage-1 iteration budget; 0 means `2000 * n_vars`
    #[serde(default)]
    pub n_iterations: usize,

    /// Number of independent trials
    #[serde(default = "default_n_runs")]
    pub n_runs: usize,

    #[serde(default = "default_n_hyper_dims")]
    pub n_hyper_dims: usize,

    #[serde(default = "default_patience")]
    pub patience: usize,

    #[serde(default = "default_delta")]
    pub delta: f64,

    /// Upper bound on concurrently running trials
    #[serde(default)]
    pub max_workers: Option<usize>,

    /// Base seed; trial `i` is seeded with `seed + i`
    #[serde(default)]
    pub seed: Option<u64>,

    /// Give up when the progress channel stays silent this long
    #[serde(default)]
    pub watchdog_secs: Option<u64>,

    /// Directory receiving one JSON artifact per trial
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_stage1_strategy")]
    pub stage1_strategy: StrategyKind,

    #[serde(default)]
    pub fine_tune: FineTuneConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_n_agents() -> usize {
    100
}

const fn default_n_vars() -> usize {
    10
}

const fn default_n_runs() -> usize {
    15
}

const fn default_n_hyper_dims() -> usize {
    4
}

const fn default_patience() -> usize {
    50
}

const fn default_delta() -> f64 {
    1e-5
}

const fn default_stage1_strategy() -> StrategyKind {
    StrategyKind::Pso
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            benchmark: String::new(),
            n_agents: default_n_agents(),
            n_vars: default_n_vars(),
            n_iterations: 0,
            n_runs: default_n_runs(),
            n_hyper_dims: default_n_hyper_dims(),
            patience: default_patience(),
            delta: default_delta(),
            max_workers: None,
            seed: None,
            watchdog_secs: None,
            output_dir: None,
            stage1_strategy: default_stage1_strategy(),
            fine_tune: FineTuneConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Stage-1 iteration budget after applying the `2000 * n_vars` default.
    pub const fn resolved_iterations(&self) -> usize {
        if self.n_iterations == 0 {
            ITERATIONS_PER_VARIABLE * self.n_vars
        } else {
            self.n_iterations
        }
    }

    /// Build the per-trial search configuration for a benchmark.
    pub fn search_config(&self, benchmark: &BenchmarkFunction) -> SearchConfig {
        SearchConfig {
            n_agents: self.n_agents,
            n_vars: self.n_vars,
            n_hyper_dims: self.n_hyper_dims,
            n_iterations: self.resolved_iterations(),
            lower_bound: benchmark.lower_bound,
            upper_bound: benchmark.upper_bound,
            patience: self.patience,
            delta: self.delta,
        }
    }
}
