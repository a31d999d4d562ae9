//! Domain models for the experiment runner.

pub mod benchmark;
pub mod config;
pub mod history;
pub mod hypercomplex;
pub mod progress;
pub mod trial;

pub use benchmark::BenchmarkFunction;
pub use config::{ExperimentConfig, FineTuneConfig, LoggingConfig, SearchConfig, StrategyKind};
pub use history::{SearchHistory, Snapshot, StopReason};
pub use hypercomplex::{HypercomplexPoint, ProjectionOrder, SearchBounds};
pub use progress::{ProgressKind, ProgressMessage};
pub use trial::{ExperimentReport, TrialFailure, TrialResult};
