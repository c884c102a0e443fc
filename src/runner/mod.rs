//! Sequential executor for the step graph.
//!
//! Steps run in dependency order. A failed step never retries; steps that
//! depend on it are skipped, and the umbrella step fails if anything below it
//! did not succeed.
use crate::error::StepError;
use crate::graph::{TaskGraph, TaskKind, TaskSpec};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::BTreeMap;

mod generator;

pub use generator::{CliGenerator, Generator};

/// Result of one executed (or skipped) step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    Failed { reason: String },
    Skipped { blocked_by: Vec<String> },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub id: String,
    pub kind: TaskKind,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub target: String,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    /// Whether the target step itself succeeded.
    pub fn succeeded(&self) -> bool {
        self.steps
            .iter()
            .find(|step| step.id == self.target)
            .is_some_and(|step| step.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Failed { .. }))
    }
}

/// Run `target` and everything it depends on.
pub fn run_target(graph: &TaskGraph, target: &str, generator: &dyn Generator) -> Result<RunReport> {
    let order = graph
        .execution_order(target)
        .ok_or_else(|| anyhow!("unknown task '{target}'"))?;

    let mut outcomes: BTreeMap<&str, StepOutcome> = BTreeMap::new();
    let mut steps = Vec::with_capacity(order.len());
    for task in order {
        let blocked_by: Vec<String> = task
            .depends_on
            .iter()
            .filter(|dep| {
                !outcomes
                    .get(dep.as_str())
                    .is_some_and(StepOutcome::is_success)
            })
            .cloned()
            .collect();

        let outcome = if blocked_by.is_empty() {
            execute(task, generator)
        } else if task.kind == TaskKind::Aggregate {
            StepOutcome::Failed {
                reason: format!("dependencies did not succeed: {}", blocked_by.join(", ")),
            }
        } else {
            StepOutcome::Skipped { blocked_by }
        };

        match &outcome {
            StepOutcome::Succeeded => tracing::debug!(task = %task.id, "step succeeded"),
            StepOutcome::Failed { reason } => {
                tracing::warn!(task = %task.id, reason = %reason, "step failed")
            }
            StepOutcome::Skipped { blocked_by } => {
                tracing::warn!(task = %task.id, blocked_by = ?blocked_by, "step skipped")
            }
        }
        outcomes.insert(task.id.as_str(), outcome.clone());
        steps.push(StepReport {
            id: task.id.clone(),
            kind: task.kind,
            outcome,
        });
    }

    Ok(RunReport {
        target: target.to_string(),
        steps,
    })
}

fn execute(task: &TaskSpec, generator: &dyn Generator) -> StepOutcome {
    let result = match task.kind {
        TaskKind::Validate => check_spec_exists(task).and_then(|()| generator.validate(task)),
        TaskKind::Generate => generator.generate(task),
        TaskKind::Aggregate => Ok(()),
    };
    match result {
        Ok(()) => StepOutcome::Succeeded,
        Err(err) => StepOutcome::Failed {
            reason: err.to_string(),
        },
    }
}

/// A spec's existence is only checked when its validate step runs.
fn check_spec_exists(task: &TaskSpec) -> Result<(), StepError> {
    match &task.spec_path {
        Some(path) if path.is_file() => Ok(()),
        Some(path) => Err(StepError::SpecNotFound(path.clone())),
        None => Err(StepError::SpecNotFound(Default::default())),
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
