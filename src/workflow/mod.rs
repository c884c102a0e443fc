//! Command workflows.
//!
//! Each command loads a context, resolves, and prints; only `run` touches the
//! generator.
mod context;
mod plan;
mod resolve;
mod run;
mod tasks;

pub(crate) use context::GenerationContext;
pub use plan::run_plan;
pub use resolve::run_resolve;
pub use run::run_run;
pub use tasks::run_tasks;
