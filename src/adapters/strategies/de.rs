//! Differential Evolution (DE/rand/1/bin).
//!
//! ```text
//! For each target vector xᵢ:
//!   1. Select 3 distinct random vectors xₐ, xᵦ, xᵧ
//!   2. Mutant: v = xₐ + F·(xᵦ - xᵧ)
//!   3. Crossover: uⱼ = vⱼ if rand() < CR else xᵢⱼ
//!   4. Selection: xᵢ' = u if f(u) ≤ f(xᵢ) else xᵢ
//! ```
//!
//! The engine evaluates whatever `step` returns, so selection happens one
//! call later: the population handed to `step` holds the trial vectors whose
//! fitness is compared against the remembered parents.
//!
//! Reference: Storn & Price (1997)

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::models::SearchBounds;
use crate::domain::ports::SearchStrategy;

/// Classic differential evolution with fixed F and CR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferentialEvolution {
    /// Mutation factor F ∈ [0, 2] (default: 0.8)
    pub mutation_factor: f64,

    /// Crossover rate CR ∈ [0, 1] (default: 0.9)
    pub crossover_rate: f64,

    #[serde(skip)]
    parents: Vec<Vec<f64>>,
    #[serde(skip)]
    parent_fitness: Vec<f64>,
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self::new(0.8, 0.9)
    }
}

impl DifferentialEvolution {
    pub const fn new(mutation_factor: f64, crossover_rate: f64) -> Self {
        Self {
            mutation_factor,
            crossover_rate,
            parents: Vec::new(),
            parent_fitness: Vec::new(),
        }
    }

    fn select(&mut self, trials: &[Vec<f64>], fitness: &[f64]) {
        if self.parents.len() != trials.len() {
            self.parents = trials.to_vec();
            self.parent_fitness = fitness.to_vec();
            return;
        }
        for (i, (trial, &value)) in trials.iter().zip(fitness).enumerate() {
            if value <= self.parent_fitness[i] {
                self.parents[i].clone_from(trial);
                self.parent_fitness[i] = value;
            }
        }
    }

    /// Three indices different from `exclude` (and from each other when the
    /// population is large enough).
    fn select_random_triple(n: usize, exclude: usize, rng: &mut StdRng) -> [usize; 3] {
        if n < 4 {
            return [rng.gen_range(0..n), rng.gen_range(0..n), rng.gen_range(0..n)];
        }
        let mut indices = Vec::with_capacity(3);
        while indices.len() < 3 {
            let idx = rng.gen_range(0..n);
            if idx != exclude && !indices.contains(&idx) {
                indices.push(idx);
            }
        }
        [indices[0], indices[1], indices[2]]
    }
}

impl SearchStrategy for DifferentialEvolution {
    fn name(&self) -> &'static str {
        "de"
    }

    fn step(
        &mut self,
        population: &[Vec<f64>],
        fitness: &[f64],
        bounds: &SearchBounds,
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>> {
        self.select(population, fitness);
        let n = self.parents.len();

        (0..n)
            .map(|i| {
                let [a, b, c] = Self::select_random_triple(n, i, rng);
                let target = &self.parents[i];
                let dim = target.len();
                let j_rand = rng.gen_range(0..dim.max(1));
                (0..dim)
                    .map(|j| {
                        if j == j_rand || rng.gen::<f64>() < self.crossover_rate {
                            let mutant = self
                                .mutation_factor
                                .mul_add(self.parents[b][j] - self.parents[c][j], self.parents[a][j]);
                            bounds.clamp(mutant)
                        } else {
                            target[j]
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
