//! Core services: projection, search, progress protocol and orchestration.

pub mod convergence_monitor;
pub mod experiment_orchestrator;
pub mod experiment_summary;
pub mod progress;
pub mod projection;
pub mod search_engine;
pub mod trial_runner;

pub use convergence_monitor::{ConvergenceDecision, ConvergenceMonitor};
pub use experiment_orchestrator::ExperimentOrchestrator;
pub use experiment_summary::{ExperimentSummary, MeanStd, StageStats};
pub use progress::{ProgressReporter, ProgressTracker, TrialProgress};
pub use projection::{project, HypercomplexObjective, ProjectionOrderObjective};
pub use search_engine::SearchEngine;
pub use trial_runner::TrialRunner;
