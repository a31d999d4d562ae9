//! Port trait definitions (Hexagonal Architecture)
//!
//! The core drives its collaborators only through these traits:
//! - SearchStrategy: population-based search algorithm (PSO, BHA, DE, ...)
//! - Objective: scalar function evaluated at a candidate position
//! - ProgressSink: renderer for the multiplexed progress stream
//! - ResultStore: destination for finished trial results

pub mod objective;
pub mod progress_sink;
pub mod result_store;
pub mod search_strategy;

pub use objective::Objective;
pub use progress_sink::{NullProgressSink, ProgressSink};
pub use result_store::ResultStore;
pub use search_strategy::{uniform_population, SearchStrategy};
