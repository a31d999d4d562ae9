//! Adapters plugging concrete algorithms, benchmarks and storage into the
//! domain ports.

pub mod benchmarks;
pub mod storage;
pub mod strategies;
