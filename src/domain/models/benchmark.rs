use serde::Serialize;

use crate::domain::errors::ObjectiveError;

/// A closed-form benchmark objective together with its search domain.
///
/// Benchmarks are immutable and cheap to copy, so every trial gets its own
/// value and nothing is shared across worker threads.
#[derive(Clone, Copy, Serialize)]
pub struct BenchmarkFunction {
    pub name: &'static str,
    #[serde(skip)]
    function: fn(&[f64]) -> f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl BenchmarkFunction {
    pub const fn new(
        name: &'static str,
        function: fn(&[f64]) -> f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Self {
            name,
            function,
            lower_bound,
            upper_bound,
        }
    }

    /// Evaluate the benchmark, rejecting NaN and infinite results.
    pub fn evaluate(&self, x: &[f64]) -> Result<f64, ObjectiveError> {
        let value = (self.function)(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ObjectiveError::NonFinite {
                value,
                point: x.to_vec(),
            })
        }
    }
}

impl std::fmt::Debug for BenchmarkFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkFunction")
            .field("name", &self.name)
            .field("lower_bound", &self.lower_bound)
            .field("upper_bound", &self.upper_bound)
            .finish_non_exhaustive()
    }
}
