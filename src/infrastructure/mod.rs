//! Infrastructure layer module
//!
//! Ambient services the CLI wires up before running an experiment:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
