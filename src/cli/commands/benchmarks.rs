//! Implementation of the `lio benchmarks` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::adapters::benchmarks;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::BenchmarkFunction;

#[derive(Args, Debug, Default)]
pub struct BenchmarksArgs {}

#[derive(Debug, Serialize)]
pub struct BenchmarksOutput {
    pub benchmarks: Vec<BenchmarkFunction>,
}

impl CommandOutput for BenchmarksOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_benchmarks(&self.benchmarks)
    }
}

pub fn execute(_args: BenchmarksArgs, json_mode: bool) -> Result<()> {
    let output_data = BenchmarksOutput {
        benchmarks: benchmarks::all().to_vec(),
    };
    output(&output_data, json_mode);
    Ok(())
}
