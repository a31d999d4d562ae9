//! LIO - hypercomplex two-stage optimization experiments
//!
//! Each trial searches a higher-dimensional "hypercomplex" space whose rows
//! are projected onto the real decision vector through a normalized p-norm,
//! then tunes the projection order `p` for the best point found. Many
//! independent trials run in parallel and report progress over one shared
//! channel.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): projection, search engine, progress
//!   protocol, trials and the orchestrator
//! - **Adapters** (`adapters`): benchmark catalogue, search strategies,
//!   result storage
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use lio::adapters::benchmarks;
//! use lio::domain::models::ExperimentConfig;
//! use lio::domain::ports::NullProgressSink;
//! use lio::services::{ExperimentOrchestrator, TrialRunner};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ExperimentConfig {
//!     benchmark: "sphere".into(),
//!     n_runs: 4,
//!     ..Default::default()
//! };
//! let benchmark = benchmarks::get(&config.benchmark)?;
//! let orchestrator = ExperimentOrchestrator::new(TrialRunner::default());
//! let report = orchestrator
//!     .run_experiment(&benchmark, &config.search_config(&benchmark), config.n_runs, &mut NullProgressSink)
//!     .await?;
//! println!("{} trials succeeded", report.results.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, ObjectiveError};
pub use domain::models::{
    BenchmarkFunction, ExperimentConfig, ExperimentReport, ProgressMessage, SearchConfig,
    TrialResult,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ExperimentOrchestrator, ExperimentSummary, TrialRunner};
