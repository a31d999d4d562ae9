//! Particle Swarm Optimization (PSO).
//!
//! Each particle keeps a velocity and remembers its personal best:
//!
//! ```text
//! vᵢ ← w·vᵢ + c₁·r₁·(pᵢ - xᵢ) + c₂·r₂·(g - xᵢ)
//! xᵢ ← clip(xᵢ + vᵢ)
//! ```
//!
//! Reference: Kennedy & Eberhart (1995)

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::models::SearchBounds;
use crate::domain::ports::{uniform_population, SearchStrategy};

/// Particle swarm with inertia weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSwarm {
    /// Inertia weight w (default: 0.7)
    pub inertia: f64,

    /// Cognitive coefficient c₁ (default: 1.7)
    pub cognitive: f64,

    /// Social coefficient c₂ (default: 1.7)
    pub social: f64,

    #[serde(skip)]
    velocities: Vec<Vec<f64>>,
    #[serde(skip)]
    personal_best: Vec<Vec<f64>>,
    #[serde(skip)]
    personal_best_fitness: Vec<f64>,
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self::new(0.7, 1.7, 1.7)
    }
}

impl ParticleSwarm {
    pub const fn new(inertia: f64, cognitive: f64, social: f64) -> Self {
        Self {
            inertia,
            cognitive,
            social,
            velocities: Vec::new(),
            personal_best: Vec::new(),
            personal_best_fitness: Vec::new(),
        }
    }

    fn reset(&mut self, population_size: usize, dim: usize) {
        self.velocities = vec![vec![0.0; dim]; population_size];
        self.personal_best.clear();
        self.personal_best_fitness.clear();
    }

    fn update_personal_bests(&mut self, population: &[Vec<f64>], fitness: &[f64]) {
        if self.personal_best.len() != population.len() {
            self.personal_best = population.to_vec();
            self.personal_best_fitness = fitness.to_vec();
            return;
        }
        for (i, (position, &value)) in population.iter().zip(fitness).enumerate() {
            if value < self.personal_best_fitness[i] {
                self.personal_best[i].clone_from(position);
                self.personal_best_fitness[i] = value;
            }
        }
    }

    fn global_best(&self) -> usize {
        self.personal_best_fitness
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i)
    }
}

impl SearchStrategy for ParticleSwarm {
    fn name(&self) -> &'static str {
        "pso"
    }

    fn initialize(
        &mut self,
        population_size: usize,
        bounds: &SearchBounds,
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>> {
        self.reset(population_size, bounds.dim);
        uniform_population(population_size, bounds, rng)
    }

    fn step(
        &mut self,
        population: &[Vec<f64>],
        fitness: &[f64],
        bounds: &SearchBounds,
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>> {
        if self.velocities.len() != population.len() {
            self.reset(population.len(), bounds.dim);
        }
        self.update_personal_bests(population, fitness);

        let global = self.personal_best[self.global_best()].clone();
        let max_speed = bounds.width();

        population
            .iter()
            .enumerate()
            .map(|(i, position)| {
                position
                    .iter()
                    .enumerate()
                    .map(|(j, &x)| {
                        let r1: f64 = rng.gen();
                        let r2: f64 = rng.gen();
                        let v = self.inertia * self.velocities[i][j]
                            + self.cognitive * r1 * (self.personal_best[i][j] - x)
                            + self.social * r2 * (global[j] - x);
                        let v = v.clamp(-max_speed, max_speed);
                        self.velocities[i][j] = v;
                        bounds.clamp(x + v)
                    })
                    .collect()
            })
            .collect()
    }
}
