//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::benchmarks::BenchmarksArgs;
use super::commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "lio")]
#[command(about = "LIO - hypercomplex two-stage optimization experiments", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run repeated trials of the two-stage search on one benchmark
    Run(RunArgs),

    /// List the available benchmark functions
    Benchmarks(BenchmarksArgs),
}
