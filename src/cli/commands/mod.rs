//! CLI command implementations.

pub mod benchmarks;
pub mod run;
