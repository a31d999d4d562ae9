//! Black Hole Algorithm (BHA).
//!
//! The best candidate becomes the black hole; every other star drifts
//! towards it by a random fraction of the distance. Stars that cross the
//! event horizon are swallowed and re-born at a random position:
//!
//! ```text
//! xᵢ ← xᵢ + r·(x_bh - xᵢ)
//! R  = f_bh / Σ fᵢ
//! ‖xᵢ - x_bh‖ < R  ⇒  xᵢ ← random
//! ```
//!
//! Reference: Hatamlou (2013)

use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::models::SearchBounds;
use crate::domain::ports::search_strategy::random_position;
use crate::domain::ports::SearchStrategy;

/// Parameter-free black hole search.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackHole;

impl BlackHole {
    fn event_horizon(fitness: &[f64], black_hole: usize) -> f64 {
        let total: f64 = fitness.iter().map(|f| f.abs()).sum();
        let radius = fitness[black_hole].abs() / total;
        if radius.is_finite() {
            radius
        } else {
            0.0
        }
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

impl SearchStrategy for BlackHole {
    fn name(&self) -> &'static str {
        "bha"
    }

    fn step(
        &mut self,
        population: &[Vec<f64>],
        fitness: &[f64],
        bounds: &SearchBounds,
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>> {
        let Some(black_hole) = fitness
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
        else {
            return population.to_vec();
        };

        let radius = Self::event_horizon(fitness, black_hole);
        let center = &population[black_hole];

        population
            .iter()
            .enumerate()
            .map(|(i, star)| {
                if i == black_hole {
                    return star.clone();
                }
                let moved: Vec<f64> = star
                    .iter()
                    .zip(center)
                    .map(|(&x, &c)| {
                        let r: f64 = rng.gen();
                        bounds.clamp(r.mul_add(c - x, x))
                    })
                    .collect();
                if distance(&moved, center) < radius {
                    random_position(bounds, rng)
                } else {
                    moved
                }
            })
            .collect()
    }
}
