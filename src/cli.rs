//! CLI argument parsing for the spec discovery and generation workflow.
//!
//! Flags only carry overrides; every default is derived from the project's
//! place in the source tree.
use crate::conventions::{Pipeline, GENERATE_ALL_TASK};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "specgen",
    version,
    about = "Discover OpenAPI specs in a modules tree and drive code generation",
    after_help = "Commands:\n  resolve --project <dir>   Print the resolved spec entries\n  plan --project <dir>      Print the step graph and source set as JSON\n  tasks --project <dir>     List steps with their dependencies\n  run --project <dir>       Run generateAllCode (or a single step)\n\nExamples:\n  specgen resolve --project modules/all/frontend/product\n  specgen plan --project modules/orders/api --pipeline server --out plan.json\n  specgen run --project modules/all/frontend/product --generator 'npx @openapitools/openapi-generator-cli'\n  specgen run --project . validate_orders",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

impl RootArgs {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Resolve(args) => args.project.verbose,
            Command::Plan(args) => args.project.verbose,
            Command::Tasks(args) => args.project.verbose,
            Command::Run(args) => args.project.verbose,
        }
    }
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Resolve(ResolveArgs),
    Plan(PlanArgs),
    Tasks(TasksArgs),
    Run(RunArgs),
}

/// Project selection and config overrides shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Consuming project directory (must sit below a `modules` directory)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project: PathBuf,

    /// Declared config file (defaults to <project>/openapi-generator.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pipeline to configure, overriding the config file
    #[arg(long, value_enum)]
    pub pipeline: Option<Pipeline>,

    /// Output root, overriding the config file
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Base package for the server pipeline, overriding the config file
    #[arg(long, value_name = "PKG")]
    pub base_package: Option<String>,

    /// Emit debug logs to stderr
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Resolve spec entries and print them as JSON")]
pub struct ResolveArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Build the step graph and print it with the source set as JSON")]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Write the plan to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "List generation steps in execution order")]
pub struct TasksArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Run a step and everything it depends on")]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Step to run
    #[arg(value_name = "STEP", default_value = GENERATE_ALL_TASK)]
    pub target: String,

    /// Generator command line (defaults to $SPECGEN_GENERATOR, then openapi-generator-cli)
    #[arg(long, value_name = "CMD")]
    pub generator: Option<String>,

    /// Emit the run report as JSON
    #[arg(long)]
    pub json: bool,
}
