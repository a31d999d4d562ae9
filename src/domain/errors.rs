//! Domain errors for the LIO experiment runner.

use thiserror::Error;

/// Errors raised while evaluating an objective at a candidate point.
///
/// A benchmark with a singularity (or any other out-of-domain input) reports
/// NaN or infinity; those values are turned into [`ObjectiveError::NonFinite`]
/// instead of being allowed to poison the search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectiveError {
    #[error("expected a vector of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("objective returned a non-finite value ({value}) at {point:?}")]
    NonFinite { value: f64, point: Vec<f64> },

    #[error("projection order {0} is not a positive finite number")]
    InvalidOrder(f64),
}

/// Domain-level errors that can occur while running an experiment.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown benchmark function: {0}")]
    UnknownBenchmark(String),

    #[error("Invalid projection order {0}: must be finite and greater than zero")]
    InvalidProjectionOrder(f64),

    #[error("Objective evaluation failed for '{benchmark}': {source}")]
    Objective {
        benchmark: String,
        #[source]
        source: ObjectiveError,
    },

    #[error("Trial {trial_id} failed: {reason}")]
    TrialFailed { trial_id: usize, reason: String },

    #[error("Progress protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("No progress received for {waited_ms}ms; {missing} trial(s) never finished")]
    WatchdogExpired { waited_ms: u64, missing: usize },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Wrap an objective failure with the name of the benchmark that raised it.
    pub fn objective(benchmark: impl Into<String>, source: ObjectiveError) -> Self {
        Self::Objective {
            benchmark: benchmark.into(),
            source,
        }
    }

    /// Whether this error was detected before any trial could be scheduled.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::UnknownBenchmark(_) | Self::InvalidProjectionOrder(_)
        )
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
