//! Parallel multi-trial execution.
//!
//! Trials run on tokio's blocking pool, bounded by a semaphore sized to
//! `min(max_workers, n_runs)`. Every trial reports over one shared unbounded
//! channel; this task is its only consumer and drains it until all `n_runs`
//! sentinels have been observed.
//!
//! ```text
//!  trial 0 ─┐
//!  trial 1 ─┼─ ProgressMessage ─▶ ProgressTracker ─▶ ProgressSink
//!  trial k ─┘         (unbounded mpsc)
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinError;
use tracing::{info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    BenchmarkFunction, ExperimentReport, ProgressMessage, SearchConfig, TrialFailure,
};
use crate::domain::ports::{ProgressSink, ResultStore};
use crate::services::progress::{ProgressReporter, ProgressTracker};
use crate::services::trial_runner::TrialRunner;

/// Runs `n_runs` independent trials and aggregates their outcomes.
#[derive(Clone)]
pub struct ExperimentOrchestrator {
    runner: TrialRunner,
    max_workers: Option<usize>,
    watchdog: Option<Duration>,
    store: Option<Arc<dyn ResultStore>>,
}

impl std::fmt::Debug for ExperimentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentOrchestrator")
            .field("runner", &self.runner)
            .field("max_workers", &self.max_workers)
            .field("watchdog", &self.watchdog)
            .field("persists", &self.store.is_some())
            .finish()
    }
}

impl ExperimentOrchestrator {
    pub const fn new(runner: TrialRunner) -> Self {
        Self {
            runner,
            max_workers: None,
            watchdog: None,
            store: None,
        }
    }

    /// Cap the pool below the machine's available parallelism.
    #[must_use]
    pub const fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Fail the experiment when no progress message arrives for this long.
    #[must_use]
    pub const fn with_watchdog(mut self, watchdog: Option<Duration>) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Persist every successful trial through `store`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Pool size for an experiment of `n_runs` trials.
    pub fn worker_count(&self, n_runs: usize) -> usize {
        let available = self.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        });
        available.min(n_runs).max(1)
    }

    fn validate(&self, search: &SearchConfig, n_runs: usize) -> DomainResult<()> {
        if n_runs == 0 {
            return Err(DomainError::InvalidConfig("n_runs must be positive".into()));
        }
        if self.max_workers == Some(0) {
            return Err(DomainError::InvalidConfig(
                "max_workers must be positive".into(),
            ));
        }
        search.validate()?;
        self.runner.fine_tune().validate()
    }

    /// Run the whole experiment.
    ///
    /// Configuration errors are returned before anything is scheduled. A
    /// failing or panicking trial becomes a [`TrialFailure`] in the report;
    /// its siblings still contribute their results.
    #[instrument(skip(self, benchmark, search, sink), fields(benchmark = benchmark.name))]
    pub async fn run_experiment(
        &self,
        benchmark: &BenchmarkFunction,
        search: &SearchConfig,
        n_runs: usize,
        sink: &mut dyn ProgressSink,
    ) -> DomainResult<ExperimentReport> {
        self.validate(search, n_runs)?;

        let workers = self.worker_count(n_runs);
        info!(n_runs, workers, n_iterations = search.n_iterations, "starting experiment");

        let semaphore = Arc::new(Semaphore::new(workers));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handles: Vec<_> = (0..n_runs)
            .map(|trial_id| {
                // Created before queuing so a trial that never starts still
                // closes its stream.
                let reporter = ProgressReporter::new(trial_id, tx.clone());
                let semaphore = Arc::clone(&semaphore);
                let runner = self.runner.clone();
                let benchmark = *benchmark;
                let search = search.clone();

                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.map_err(|_| {
                        DomainError::TrialFailed {
                            trial_id,
                            reason: "worker pool closed".into(),
                        }
                    })?;
                    tokio::task::spawn_blocking(move || {
                        runner.execute(trial_id, &benchmark, &search, reporter)
                    })
                    .await
                    .map_err(|e| DomainError::TrialFailed {
                        trial_id,
                        reason: join_failure_reason(e),
                    })?
                })
            })
            .collect();
        drop(tx);

        if let Err(err) = self.drain(&mut rx, n_runs, sink).await {
            // Queued trials never start; running ones finish unobserved
            for handle in &handles {
                handle.abort();
            }
            return Err(err);
        }

        let mut report = ExperimentReport {
            benchmark: benchmark.name.to_string(),
            n_runs,
            workers,
            ..Default::default()
        };

        for (trial_id, outcome) in join_all(handles).await.into_iter().enumerate() {
            match outcome {
                Ok(Ok(result)) => report.results.push(result),
                Ok(Err(err)) => {
                    warn!(trial_id, error = %err, "trial failed");
                    report.failures.push(TrialFailure {
                        trial_id,
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    let reason = join_failure_reason(err);
                    warn!(trial_id, %reason, "trial task aborted");
                    report.failures.push(TrialFailure { trial_id, reason });
                }
            }
        }

        if let Some(store) = &self.store {
            Self::persist(store.as_ref(), &mut report).await;
        }

        info!(
            succeeded = report.results.len(),
            failed = report.failures.len(),
            "experiment finished"
        );
        Ok(report)
    }

    /// Consume the progress stream until every trial has sent its sentinel.
    async fn drain(
        &self,
        rx: &mut mpsc::UnboundedReceiver<ProgressMessage>,
        n_runs: usize,
        sink: &mut dyn ProgressSink,
    ) -> DomainResult<()> {
        let mut tracker = ProgressTracker::new(n_runs);
        while !tracker.is_done() {
            let received = match self.watchdog {
                Some(limit) => tokio::time::timeout(limit, rx.recv()).await.map_err(|_| {
                    warn!(missing = tracker.missing(), "progress watchdog expired");
                    DomainError::WatchdogExpired {
                        waited_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        missing: tracker.missing(),
                    }
                })?,
                None => rx.recv().await,
            };
            let Some(message) = received else {
                return Err(DomainError::ProtocolViolation(format!(
                    "progress channel closed with {} sentinel(s) outstanding",
                    tracker.missing()
                )));
            };
            tracker.accept(&message)?;
            sink.on_message(&message);
        }
        sink.on_finished();
        Ok(())
    }

    async fn persist(store: &dyn ResultStore, report: &mut ExperimentReport) {
        let saved = join_all(report.results.iter().map(|result| store.save(result))).await;
        for outcome in saved {
            match outcome {
                Ok(path) => report.artifacts.push(path),
                Err(err) => {
                    warn!(error = %err, "failed to persist trial result");
                    report.persistence_errors.push(err.to_string());
                }
            }
        }
    }
}

fn join_failure_reason(err: JoinError) -> String {
    if err.is_cancelled() {
        return "trial was cancelled".into();
    }
    let payload = err.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .map_or_else(|| "trial panicked".into(), |msg| format!("trial panicked: {msg}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::benchmarks;
    use crate::domain::models::FineTuneConfig;
    use crate::domain::models::StrategyKind;
    use crate::domain::ports::NullProgressSink;

    fn search(benchmark: &BenchmarkFunction) -> SearchConfig {
        SearchConfig {
            n_agents: 6,
            n_vars: 2,
            n_hyper_dims: 4,
            n_iterations: 15,
            lower_bound: benchmark.lower_bound,
            upper_bound: benchmark.upper_bound,
            patience: 5,
            delta: 1e-5,
        }
    }

    fn orchestrator() -> ExperimentOrchestrator {
        ExperimentOrchestrator::new(TrialRunner::new(StrategyKind::Pso, FineTuneConfig::default()))
    }

    #[test]
    fn test_worker_count_is_bounded_by_runs() {
        let orchestrator = orchestrator().with_max_workers(Some(8));
        assert_eq!(orchestrator.worker_count(3), 3);
        assert_eq!(orchestrator.worker_count(20), 8);
        assert_eq!(orchestrator.with_max_workers(None).worker_count(1), 1);
    }

    #[tokio::test]
    async fn test_configuration_errors_fail_fast() {
        let sphere = benchmarks::get("sphere").unwrap();
        let mut bad = search(&sphere);
        bad.n_agents = 0;

        let err = orchestrator()
            .run_experiment(&sphere, &bad, 2, &mut NullProgressSink)
            .await
            .unwrap_err();
        assert!(err.is_configuration_error());

        let err = orchestrator()
            .run_experiment(&sphere, &search(&sphere), 0, &mut NullProgressSink)
            .await
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[tokio::test]
    async fn test_panicking_trial_is_recorded_as_failure() {
        let exploding = BenchmarkFunction::new("exploding", |_| panic!("objective exploded"), -1.0, 1.0);

        let report = orchestrator()
            .with_max_workers(Some(2))
            .run_experiment(&exploding, &search(&exploding), 3, &mut NullProgressSink)
            .await
            .unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.failures.len(), 3);
        assert!(report.failures[0].reason.contains("objective exploded"));
    }

    #[test]
    fn test_cancelled_reason() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let reason = rt.block_on(async {
            let handle = tokio::spawn(futures::future::pending::<()>());
            handle.abort();
            join_failure_reason(handle.await.unwrap_err())
        });
        assert_eq!(reason, "trial was cancelled");
    }
}
