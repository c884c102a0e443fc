//! Workflow run step.
//!
//! Resolution errors abort before any step runs. Step failures are reported
//! per step; the command fails when the target did not succeed.
use super::GenerationContext;
use crate::cli::RunArgs;
use crate::runner::{run_target, CliGenerator, RunReport, StepOutcome};
use anyhow::{bail, Result};

/// Run the requested step and its dependencies with the configured generator.
pub fn run_run(args: &RunArgs) -> Result<()> {
    let ctx = GenerationContext::load(&args.project)?;
    let (_, graph) = ctx.resolve_graph()?;
    let generator = CliGenerator::resolve(args.generator.as_deref())?;
    tracing::debug!(program = generator.program(), target = %args.target, "running");

    let report = run_target(&graph, &args.target, &generator)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    if !report.succeeded() {
        bail!(
            "{} did not succeed ({} failed step(s))",
            report.target,
            report.failures().count()
        );
    }
    Ok(())
}

fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    for step in &report.steps {
        let line = match &step.outcome {
            StepOutcome::Succeeded => format!("ok       {}", step.id),
            StepOutcome::Failed { reason } => format!("FAILED   {}: {reason}", step.id),
            StepOutcome::Skipped { blocked_by } => {
                let blocked = blocked_by.join(", ");
                format!("skipped  {} (blocked by {blocked})", step.id)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
