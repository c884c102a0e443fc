//! Workflow plan step.
//!
//! The plan is the full declarative output: resolved entries, the step graph
//! and the source set the host build should compile.
use super::GenerationContext;
use crate::cli::PlanArgs;
use crate::config::ResolvedConfig;
use crate::graph::TaskGraph;
use crate::sources::{register_source_set, SourceSet};
use crate::util::write_json;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationPlan {
    config: ResolvedConfig,
    tasks: TaskGraph,
    source_set: SourceSet,
}

/// Build the plan and print it (or write it to `--out`).
pub fn run_plan(args: &PlanArgs) -> Result<()> {
    let ctx = GenerationContext::load(&args.project)?;
    let (config, tasks) = ctx.resolve_graph()?;
    let source_set = register_source_set(&config, &tasks);
    let plan = GenerationPlan {
        config,
        tasks,
        source_set,
    };

    match &args.out {
        Some(out) => {
            write_json(out, &plan)?;
            if args.project.verbose {
                eprintln!("wrote {}", out.display());
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}
