//! Hypercomplex-to-real projection and the objectives built on top of it.
//!
//! Each hypercomplex row `z` of length `d` collapses to a scalar through its
//! normalized p-norm `‖z‖_p / d^(1/p)`, which is then rescaled from `[0, 1]`
//! into the benchmark domain `[lb, ub]`:
//!
//! ```text
//! x_i = lb + (ub - lb) * clamp(‖z_i‖_p / d^(1/p), 0, 1)
//! ```
//!
//! A row of all-ones maps to `ub`, a row of zeros maps to `lb`.

use crate::domain::errors::ObjectiveError;
use crate::domain::models::{BenchmarkFunction, HypercomplexPoint, ProjectionOrder};
use crate::domain::ports::Objective;

/// Project every row of `point` into `[lower, upper]`.
pub fn project(
    point: &HypercomplexPoint,
    lower: f64,
    upper: f64,
    order: ProjectionOrder,
) -> Vec<f64> {
    point
        .rows()
        .map(|row| project_row(row, lower, upper, order))
        .collect()
}

/// Project a single hypercomplex row.
pub fn project_row(row: &[f64], lower: f64, upper: f64, order: ProjectionOrder) -> f64 {
    let normalized = (p_norm(row, order) / normalizing_factor(row.len(), order)).clamp(0.0, 1.0);
    (upper - lower)
        .mul_add(normalized, lower)
        .max(lower)
        .min(upper)
}

/// `(Σ |z_i|^p)^(1/p)`, valid for any real `p > 0`.
pub fn p_norm(row: &[f64], order: ProjectionOrder) -> f64 {
    let p = order.value();
    row.iter()
        .map(|z| z.abs().powf(p))
        .sum::<f64>()
        .powf(p.recip())
}

/// `d^(1/p)`: the p-norm of a length-`d` row of unit-magnitude components.
fn normalizing_factor(dims: usize, order: ProjectionOrder) -> f64 {
    (dims as f64).powf(order.value().recip())
}

/// Stage-1 objective: `benchmark(project(z, lb, ub, p))` over a flat
/// hypercomplex position.
#[derive(Debug, Clone, Copy)]
pub struct HypercomplexObjective {
    benchmark: BenchmarkFunction,
    n_vars: usize,
    n_hyper_dims: usize,
    lower: f64,
    upper: f64,
    order: ProjectionOrder,
}

impl HypercomplexObjective {
    /// `(lower, upper)` is the interval rows are projected into.
    pub const fn new(
        benchmark: BenchmarkFunction,
        n_vars: usize,
        n_hyper_dims: usize,
        (lower, upper): (f64, f64),
        order: ProjectionOrder,
    ) -> Self {
        Self {
            benchmark,
            n_vars,
            n_hyper_dims,
            lower,
            upper,
            order,
        }
    }
}

impl Objective for HypercomplexObjective {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        let point = HypercomplexPoint::from_flat(position.to_vec(), self.n_vars, self.n_hyper_dims)?;
        let x = project(&point, self.lower, self.upper, self.order);
        self.benchmark.evaluate(&x)
    }
}

/// Stage-2 objective: the same benchmark at a fixed `z*`, varying only `p`.
#[derive(Debug, Clone)]
pub struct ProjectionOrderObjective<'a> {
    benchmark: BenchmarkFunction,
    point: &'a HypercomplexPoint,
    lower: f64,
    upper: f64,
}

impl<'a> ProjectionOrderObjective<'a> {
    pub const fn new(
        benchmark: BenchmarkFunction,
        point: &'a HypercomplexPoint,
        (lower, upper): (f64, f64),
    ) -> Self {
        Self {
            benchmark,
            point,
            lower,
            upper,
        }
    }
}

impl Objective for ProjectionOrderObjective<'_> {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        let [p] = position else {
            return Err(ObjectiveError::DimensionMismatch {
                expected: 1,
                actual: position.len(),
            });
        };
        let order = ProjectionOrder::new(*p).map_err(|_| ObjectiveError::InvalidOrder(*p))?;
        let x = project(self.point, self.lower, self.upper, order);
        self.benchmark.evaluate(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(p: f64) -> ProjectionOrder {
        ProjectionOrder::new(p).unwrap()
    }

    fn sphere() -> BenchmarkFunction {
        BenchmarkFunction::new("sphere", |x| x.iter().map(|v| v * v).sum(), -10.0, 10.0)
    }

    #[test]
    fn test_unit_row_maps_to_upper_bound() {
        let value = project_row(&[1.0, 1.0, 1.0, 1.0], 0.0, 1.0, ProjectionOrder::EUCLIDEAN);
        assert!((value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_row_maps_to_lower_bound() {
        for p in [0.5, 1.0, 2.0, 3.7] {
            let value = project_row(&[0.0; 4], -5.12, 5.12, order(p));
            assert!((value + 5.12).abs() < f64::EPSILON, "p = {p}: {value}");
        }
    }

    #[test]
    fn test_euclidean_norm() {
        assert!((p_norm(&[3.0, 4.0], ProjectionOrder::EUCLIDEAN) - 5.0).abs() < 1e-12);
        assert!((p_norm(&[-3.0, 4.0], order(1.0)) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_order() {
        // ‖(1, 1)‖_0.5 = (1 + 1)^2 = 4, factor 2^2 = 4
        let value = project_row(&[1.0, 1.0], 0.0, 10.0, order(0.5));
        assert!((value - 10.0).abs() < 1e-9);
        let half = project_row(&[0.25, 0.25], 0.0, 1.0, order(0.5));
        assert!((half - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_project_keeps_row_count() {
        let point = HypercomplexPoint::from_rows(&[vec![0.0; 4], vec![1.0; 4], vec![0.5; 4]]).unwrap();
        let x = project(&point, -10.0, 10.0, ProjectionOrder::EUCLIDEAN);
        assert_eq!(x.len(), 3);
        assert!((x[0] + 10.0).abs() < 1e-12);
        assert!((x[1] - 10.0).abs() < 1e-12);
        assert!(x[2].abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_components_are_clamped() {
        let value = project_row(&[3.0, 3.0], -1.0, 1.0, ProjectionOrder::EUCLIDEAN);
        assert!((value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hypercomplex_objective_composes_projection() {
        let objective = HypercomplexObjective::new(sphere(), 2, 4, (-10.0, 10.0), ProjectionOrder::EUCLIDEAN);
        // Both rows normalize to 0.5 -> x = (0, 0) -> sphere = 0
        let fitness = objective.evaluate(&[0.5; 8]).unwrap();
        assert!(fitness.abs() < 1e-12);

        let err = objective.evaluate(&[0.5; 7]).unwrap_err();
        assert!(matches!(err, ObjectiveError::DimensionMismatch { expected: 8, actual: 7 }));
    }

    #[test]
    fn test_projection_order_objective() {
        let z = HypercomplexPoint::from_rows(&[vec![0.2, 0.9, 0.4, 0.7]]).unwrap();
        let objective = ProjectionOrderObjective::new(sphere(), &z, (-10.0, 10.0));

        let at_two = objective.evaluate(&[2.0]).unwrap();
        let expected = project(&z, -10.0, 10.0, ProjectionOrder::EUCLIDEAN)[0].powi(2);
        assert!((at_two - expected).abs() < 1e-12);

        assert!(matches!(
            objective.evaluate(&[0.0]),
            Err(ObjectiveError::InvalidOrder(_))
        ));
        assert!(matches!(
            objective.evaluate(&[1.0, 2.0]),
            Err(ObjectiveError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_objectives_project_into_given_domain() {
        // Rows normalize to 0.5: the midpoint of whichever domain is given
        let objective = HypercomplexObjective::new(sphere(), 1, 4, (0.0, 1.0), ProjectionOrder::EUCLIDEAN);
        assert!((objective.evaluate(&[0.5; 4]).unwrap() - 0.25).abs() < 1e-12);

        let z = HypercomplexPoint::from_rows(&[vec![0.5; 4]]).unwrap();
        let fine = ProjectionOrderObjective::new(sphere(), &z, (2.0, 4.0));
        assert!((fine.evaluate(&[3.0]).unwrap() - 9.0).abs() < 1e-9);
    }
}
