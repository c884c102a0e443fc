//! specgen: OpenAPI spec discovery and generation driver for modules trees.
//!
//! Resolution and graph construction are pure; the runner is the only part
//! that spawns the external generator.
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod conventions;
mod error;
mod graph;
mod paths;
mod probe;
mod runner;
mod sources;
mod topology;
mod util;
mod workflow;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "SPECGEN_LOG";

fn main() -> Result<()> {
    let args = cli::RootArgs::parse();
    init_logging(args.verbose());

    match &args.command {
        cli::Command::Resolve(args) => workflow::run_resolve(args),
        cli::Command::Plan(args) => workflow::run_plan(args),
        cli::Command::Tasks(args) => workflow::run_tasks(args),
        cli::Command::Run(args) => workflow::run_run(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
