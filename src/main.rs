//! LIO CLI entry point.

use clap::Parser;

use lio::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => lio::cli::commands::run::execute(args, cli.json).await,
        Commands::Benchmarks(args) => lio::cli::commands::benchmarks::execute(args, cli.json),
    };

    if let Err(err) = result {
        lio::cli::handle_error(err, cli.json);
    }
}
