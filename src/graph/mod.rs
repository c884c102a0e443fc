//! Declarative step graph handed to whatever executes the build.
//!
//! Steps are descriptions only; nothing here touches the filesystem or runs
//! the generator.
use crate::paths::PackageNames;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

mod build;

pub use build::build_task_graph;
pub(crate) use build::{generate_id, generate_server_id, validate_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Validate,
    Generate,
    /// Umbrella step with no work of its own.
    Aggregate,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Validate => "validate",
            TaskKind::Generate => "generate",
            TaskKind::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the generation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub id: String,
    pub kind: TaskKind,
    pub description: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_name: Option<String>,
    /// Validator flags or generator config options.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub type_mappings: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub global_properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<PackageNames>,
    pub depends_on: BTreeSet<String>,
}

/// Immutable, insertion-ordered set of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskGraph {
    tasks: Vec<TaskSpec>,
}

impl TaskGraph {
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn ids_of_kind(&self, kind: TaskKind) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|task| task.kind == kind)
            .map(|task| task.id.as_str())
            .collect()
    }

    /// `target` and everything it transitively depends on, dependencies
    /// first. Ties are broken by insertion order so runs are reproducible.
    ///
    /// Returns `None` when `target` is not a step of this graph.
    pub fn execution_order(&self, target: &str) -> Option<Vec<&TaskSpec>> {
        self.get(target)?;
        let mut needed = BTreeSet::new();
        let mut stack = vec![target];
        while let Some(id) = stack.pop() {
            if !needed.insert(id) {
                continue;
            }
            if let Some(task) = self.get(id) {
                stack.extend(task.depends_on.iter().map(String::as_str));
            }
        }

        let mut ordered: Vec<&TaskSpec> = Vec::with_capacity(needed.len());
        let mut placed = BTreeSet::new();
        while placed.len() < needed.len() {
            let ready = self.tasks.iter().find(|task| {
                needed.contains(task.id.as_str())
                    && !placed.contains(task.id.as_str())
                    && task
                        .depends_on
                        .iter()
                        .all(|dep| placed.contains(dep.as_str()))
            });
            // The builder only emits edges to earlier steps, so a ready step
            // always exists.
            let task = ready?;
            placed.insert(task.id.as_str());
            ordered.push(task);
        }
        Some(ordered)
    }

    fn push(&mut self, task: TaskSpec) {
        self.tasks.push(task);
    }
}
