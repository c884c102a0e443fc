use super::{run_target, Generator, StepOutcome};
use crate::config::{ResolvedConfig, SpecEntry};
use crate::conventions::{Pipeline, GENERATE_ALL_TASK};
use crate::error::StepError;
use crate::graph::{build_task_graph, TaskGraph, TaskSpec};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Default)]
struct FakeGenerator {
    invalid: BTreeSet<String>,
    broken: BTreeSet<String>,
    calls: RefCell<Vec<String>>,
}

impl Generator for FakeGenerator {
    fn validate(&self, task: &TaskSpec) -> Result<(), StepError> {
        self.calls.borrow_mut().push(task.id.clone());
        if self.invalid.contains(&task.id) {
            return Err(StepError::ValidationFailure {
                spec: task.spec_path.clone().unwrap_or_default(),
                detail: "paths must be an object".to_string(),
            });
        }
        Ok(())
    }

    fn generate(&self, task: &TaskSpec) -> Result<(), StepError> {
        self.calls.borrow_mut().push(task.id.clone());
        if self.broken.contains(&task.id) {
            return Err(StepError::GenerationFailure {
                spec: task.spec_path.clone().unwrap_or_default(),
                detail: "template error".to_string(),
            });
        }
        Ok(())
    }
}

fn write_spec(root: &Path, name: &str) -> std::path::PathBuf {
    let path = root.join(name).join("openapi-spec.yaml");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create spec dir");
    std::fs::write(&path, "openapi: 3.0.3\n").expect("write spec");
    path
}

fn client_graph(root: &Path) -> TaskGraph {
    build_task_graph(&ResolvedConfig {
        pipeline: Pipeline::Client,
        internal_entries: ["a", "b"]
            .into_iter()
            .map(|name| SpecEntry {
                name: name.to_string(),
                api_name: name.to_string(),
                spec_path: write_spec(root, name),
                is_external: false,
            })
            .collect(),
        external_entries: BTreeMap::from([("Foo".to_string(), write_spec(root, "Foo"))]),
        output_root: root.join("out"),
        base_package: None,
    })
}

fn outcome<'a>(report: &'a super::RunReport, id: &str) -> &'a StepOutcome {
    &report
        .steps
        .iter()
        .find(|step| step.id == id)
        .unwrap_or_else(|| panic!("missing step {id}"))
        .outcome
}

#[test]
fn all_steps_succeed_in_dependency_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = client_graph(dir.path());
    let generator = FakeGenerator::default();

    let report = run_target(&graph, GENERATE_ALL_TASK, &generator).expect("run");
    assert!(report.succeeded());

    let calls = generator.calls.borrow();
    for name in ["a", "b", "Foo"] {
        let validate = calls
            .iter()
            .position(|id| *id == format!("validate_{name}"))
            .expect("validate ran");
        let generate = calls
            .iter()
            .position(|id| *id == format!("generate_{name}"))
            .expect("generate ran");
        assert!(validate < generate, "{name} generated before validation");
    }
}

#[test]
fn invalid_spec_skips_its_generate_and_fails_umbrella() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = client_graph(dir.path());
    let generator = FakeGenerator {
        invalid: BTreeSet::from(["validate_b".to_string()]),
        ..FakeGenerator::default()
    };

    let report = run_target(&graph, GENERATE_ALL_TASK, &generator).expect("run");
    assert!(!report.succeeded());
    assert!(matches!(
        outcome(&report, "validate_b"),
        StepOutcome::Failed { reason } if reason.contains("validation failed")
    ));
    assert_eq!(
        outcome(&report, "generate_b"),
        &StepOutcome::Skipped {
            blocked_by: vec!["validate_b".to_string()]
        }
    );
    assert!(!generator.calls.borrow().contains(&"generate_b".to_string()));

    // Independent entries still run.
    assert!(outcome(&report, "generate_a").is_success());
    assert!(outcome(&report, "generate_Foo").is_success());
    assert!(matches!(
        outcome(&report, GENERATE_ALL_TASK),
        StepOutcome::Failed { reason } if reason.contains("generate_b")
    ));
}

#[test]
fn missing_spec_is_reported_at_validate_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = client_graph(dir.path());
    std::fs::remove_file(dir.path().join("a/openapi-spec.yaml")).expect("remove spec");
    let generator = FakeGenerator::default();

    let report = run_target(&graph, "generate_a", &generator).expect("run");
    assert!(matches!(
        outcome(&report, "validate_a"),
        StepOutcome::Failed { reason } if reason.starts_with("spec not found")
    ));
    assert!(matches!(
        outcome(&report, "generate_a"),
        StepOutcome::Skipped { .. }
    ));
    assert!(generator.calls.borrow().is_empty());
}

#[test]
fn generation_failure_fails_umbrella() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = client_graph(dir.path());
    let generator = FakeGenerator {
        broken: BTreeSet::from(["generate_Foo".to_string()]),
        ..FakeGenerator::default()
    };

    let report = run_target(&graph, GENERATE_ALL_TASK, &generator).expect("run");
    assert_eq!(report.failures().count(), 2);
    assert!(!report.succeeded());
}

#[test]
fn single_target_runs_only_its_dependencies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = client_graph(dir.path());
    let generator = FakeGenerator::default();

    let report = run_target(&graph, "generate_Foo", &generator).expect("run");
    assert!(report.succeeded());
    assert_eq!(
        *generator.calls.borrow(),
        vec!["validate_Foo".to_string(), "generate_Foo".to_string()]
    );
}

#[test]
fn unknown_target_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = client_graph(dir.path());
    assert!(run_target(&graph, "generate_nope", &FakeGenerator::default()).is_err());
}
