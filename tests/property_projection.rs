//! Property tests for the projection, the convergence monitor and the
//! search engine.

use lio::domain::models::{HypercomplexPoint, ProjectionOrder, SearchBounds, StopReason};
use lio::domain::ports::uniform_population;
use lio::adapters::strategies::ParticleSwarm;
use lio::services::projection::project_row;
use lio::services::{ConvergenceDecision, ConvergenceMonitor, SearchEngine};
use lio::ObjectiveError;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn domain() -> impl Strategy<Value = (f64, f64)> {
    (-100.0f64..100.0, 0.01f64..200.0).prop_map(|(lower, width)| (lower, lower + width))
}

proptest! {
    /// Property: every projected coordinate lies in [lb, ub]
    #[test]
    fn prop_projection_stays_in_bounds(
        row in prop::collection::vec(-10.0f64..10.0, 1..8),
        p in 0.1f64..10.0,
        (lower, upper) in domain(),
    ) {
        let x = project_row(&row, lower, upper, ProjectionOrder::new(p).unwrap());
        prop_assert!(x >= lower && x <= upper, "{x} outside [{lower}, {upper}]");
    }

    /// Property: the projection ignores component order and sign
    #[test]
    fn prop_projection_is_symmetric(
        row in prop::collection::vec(0.0f64..1.0, 2..8),
        p in 0.5f64..6.0,
    ) {
        let order = ProjectionOrder::new(p).unwrap();
        let forward = project_row(&row, -5.0, 5.0, order);

        let mut reversed = row.clone();
        reversed.reverse();
        let negated: Vec<f64> = row.iter().map(|v| -v).collect();

        prop_assert!((forward - project_row(&reversed, -5.0, 5.0, order)).abs() < 1e-9);
        prop_assert!((forward - project_row(&negated, -5.0, 5.0, order)).abs() < 1e-9);
    }

    /// Property: a constant row c in [0, 1] maps to lb + (ub - lb) * c for any p
    #[test]
    fn prop_constant_row_is_order_independent(
        c in 0.0f64..1.0,
        dims in 1usize..8,
        p in 0.25f64..8.0,
    ) {
        let x = project_row(&vec![c; dims], -2.0, 6.0, ProjectionOrder::new(p).unwrap());
        prop_assert!((x - 8.0f64.mul_add(c, -2.0)).abs() < 1e-9);
    }

    /// Property: reshaping keeps one real coordinate per variable
    #[test]
    fn prop_point_rows_match_variables(n_vars in 1usize..10, n_hyper_dims in 1usize..6) {
        let flat = vec![0.5; n_vars * n_hyper_dims];
        let point = HypercomplexPoint::from_flat(flat, n_vars, n_hyper_dims).unwrap();
        prop_assert_eq!(point.rows().count(), n_vars);
        prop_assert!(point.rows().all(|r| r.len() == n_hyper_dims));
    }

    /// Property: the monitor never exceeds its budget and early stops exactly
    /// after `patience` stale iterations
    #[test]
    fn prop_monitor_respects_budget(
        values in prop::collection::vec(0.0f64..100.0, 1..300),
        patience in 0usize..20,
        max_iterations in 1usize..200,
    ) {
        let mut monitor = ConvergenceMonitor::new(patience, 1e-5, max_iterations);
        let mut stopped = None;
        for value in values {
            if let ConvergenceDecision::Stop(reason) = monitor.observe(value) {
                stopped = Some(reason);
                break;
            }
        }

        prop_assert!(monitor.iterations() <= max_iterations);
        match stopped {
            Some(StopReason::EarlyStopped) => {
                prop_assert_eq!(monitor.stale_iterations(), patience);
            }
            Some(StopReason::MaxIterations) => prop_assert_eq!(monitor.iterations(), max_iterations),
            None => prop_assert!(monitor.iterations() < max_iterations),
        }
    }

    /// Property: best-so-far history is monotone and inside the bounds
    #[test]
    fn prop_search_history_is_monotone(seed in any::<u64>(), dim in 1usize..6) {
        let bounds = SearchBounds::unit(dim);
        let engine = SearchEngine::new(6, bounds, 20).with_early_stopping(5, 1e-5);
        let mut rng = StdRng::seed_from_u64(seed);
        let objective = |x: &[f64]| -> Result<f64, ObjectiveError> {
            Ok(x.iter().map(|v| (v - 0.3).powi(2)).sum())
        };

        let history = engine
            .run(&mut ParticleSwarm::default(), &objective, &mut rng, |_, _| {})
            .unwrap();

        let trace: Vec<f64> = history.fitness_trace().collect();
        prop_assert!(trace.windows(2).all(|w| w[1] <= w[0]));
        prop_assert!(history.len() <= 20);
        prop_assert!(bounds.contains(&history.best().unwrap().best_point));
    }

    /// Property: uniform initialization always respects the bounds
    #[test]
    fn prop_uniform_population_in_bounds(seed in any::<u64>(), (lower, upper) in domain()) {
        let bounds = SearchBounds::new(3, lower, upper);
        let mut rng = StdRng::seed_from_u64(seed);
        let population = uniform_population(10, &bounds, &mut rng);
        prop_assert!(population.iter().all(|p| bounds.contains(p)));
    }
}
