//! Population-search strategies the engine can drive.

pub mod bha;
pub mod de;
pub mod pso;

pub use bha::BlackHole;
pub use de::DifferentialEvolution;
pub use pso::ParticleSwarm;

use crate::domain::models::StrategyKind;
use crate::domain::ports::SearchStrategy;

/// Build a fresh strategy instance with default hyperparameters.
pub fn build_strategy(kind: StrategyKind) -> Box<dyn SearchStrategy> {
    match kind {
        StrategyKind::Pso => Box::new(ParticleSwarm::default()),
        StrategyKind::Bha => Box::new(BlackHole),
        StrategyKind::De => Box::new(DifferentialEvolution::default()),
    }
}
