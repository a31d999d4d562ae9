//! Domain layer for the LIO experiment runner
//!
//! This module contains the core data model and the ports the services
//! drive; it has no knowledge of threads, files or terminals.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult, ObjectiveError};
