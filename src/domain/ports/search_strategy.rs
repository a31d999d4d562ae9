use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::models::SearchBounds;

/// A population-based search algorithm driven by the search engine.
///
/// The engine owns iteration control, fitness evaluation, history and the
/// stopping decision; a strategy only turns a population and its fitness
/// values into the next population. Strategies may keep internal state
/// (velocities, personal bests) between calls to [`SearchStrategy::step`].
pub trait SearchStrategy: Send {
    fn name(&self) -> &'static str;

    /// Create the initial population. Defaults to uniform sampling.
    fn initialize(
        &mut self,
        population_size: usize,
        bounds: &SearchBounds,
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>> {
        uniform_population(population_size, bounds, rng)
    }

    /// Produce the next population. `fitness[i]` belongs to `population[i]`.
    /// Every returned position must lie within `bounds`.
    fn step(
        &mut self,
        population: &[Vec<f64>],
        fitness: &[f64],
        bounds: &SearchBounds,
        rng: &mut StdRng,
    ) -> Vec<Vec<f64>>;
}

/// Sample `population_size` points uniformly inside `bounds`.
pub fn uniform_population(
    population_size: usize,
    bounds: &SearchBounds,
    rng: &mut StdRng,
) -> Vec<Vec<f64>> {
    (0..population_size)
        .map(|_| random_position(bounds, rng))
        .collect()
}

pub(crate) fn random_position(bounds: &SearchBounds, rng: &mut StdRng) -> Vec<f64> {
    (0..bounds.dim)
        .map(|_| rng.gen_range(bounds.lower..=bounds.upper))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_population_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = SearchBounds::new(3, -2.0, 5.0);
        let population = uniform_population(50, &bounds, &mut rng);

        assert_eq!(population.len(), 50);
        assert!(population.iter().all(|p| bounds.contains(p)));
    }
}
