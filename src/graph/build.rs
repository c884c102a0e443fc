use super::{TaskGraph, TaskKind, TaskSpec};
use crate::config::{ResolvedConfig, SpecEntry};
use crate::conventions::{self, generators, Pipeline, GENERATE_ALL_TASK, TASK_GROUP};
use crate::paths::{OutputPaths, PackageNames};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub(crate) fn validate_id(name: &str) -> String {
    format!("validate_{name}")
}

pub(crate) fn generate_id(name: &str) -> String {
    format!("generate_{name}")
}

pub(crate) fn generate_server_id(name: &str) -> String {
    format!("generate_{name}_server")
}

/// Build the validate → generate → umbrella graph for a resolved config.
///
/// Every entry gets a validate step and a generate step that depends on it.
/// The single-spec pipeline also generates server interfaces from its
/// internal spec. `generateAllCode` depends on every generate step.
pub fn build_task_graph(config: &ResolvedConfig) -> TaskGraph {
    let paths = OutputPaths::new(config);
    let mut graph = TaskGraph::default();
    let mut generate_ids = BTreeSet::new();

    for entry in config.all_entries() {
        graph.push(validate_task(&entry));

        if config.pipeline == Pipeline::Server && !entry.is_external {
            let server = server_task(&entry, &paths);
            generate_ids.insert(server.id.clone());
            graph.push(server);
        }

        let generate = match config.pipeline {
            Pipeline::Client => typescript_client_task(&entry, &paths),
            Pipeline::Server => java_client_task(&entry, &paths),
        };
        generate_ids.insert(generate.id.clone());
        graph.push(generate);
    }

    let description = match config.pipeline {
        Pipeline::Client => "Runs all generate tasks which generate Axios client code.",
        Pipeline::Server => "Runs all generate tasks which generate Java code.",
    };
    graph.push(TaskSpec {
        depends_on: generate_ids,
        ..base_task(
            GENERATE_ALL_TASK.to_string(),
            TaskKind::Aggregate,
            description.to_string(),
        )
    });

    tracing::debug!(
        pipeline = %config.pipeline,
        tasks = graph.tasks().len(),
        "built task graph"
    );
    graph
}

fn base_task(id: String, kind: TaskKind, description: String) -> TaskSpec {
    TaskSpec {
        id,
        kind,
        description,
        group: TASK_GROUP.to_string(),
        spec_path: None,
        output_dir: None,
        generator_name: None,
        options: BTreeMap::new(),
        type_mappings: BTreeMap::new(),
        global_properties: BTreeMap::new(),
        packages: None,
        depends_on: BTreeSet::new(),
    }
}

fn validate_task(entry: &SpecEntry) -> TaskSpec {
    TaskSpec {
        spec_path: Some(entry.spec_path.clone()),
        options: conventions::validate_options(),
        ..base_task(
            validate_id(&entry.name),
            TaskKind::Validate,
            format!(
                "Validates openapi specification file for {} API by running OpenAPI Generator.",
                entry.api_name
            ),
        )
    }
}

struct GenerateParts {
    id: String,
    description: String,
    generator: &'static str,
    output_dir: PathBuf,
    options: BTreeMap<String, String>,
    type_mappings: BTreeMap<String, String>,
    global_properties: BTreeMap<String, String>,
    packages: Option<PackageNames>,
}

fn generate_task(entry: &SpecEntry, parts: GenerateParts) -> TaskSpec {
    TaskSpec {
        spec_path: Some(entry.spec_path.clone()),
        output_dir: Some(parts.output_dir),
        generator_name: Some(parts.generator.to_string()),
        options: parts.options,
        type_mappings: parts.type_mappings,
        global_properties: parts.global_properties,
        packages: parts.packages,
        depends_on: BTreeSet::from([validate_id(&entry.name)]),
        ..base_task(parts.id, TaskKind::Generate, parts.description)
    }
}

fn typescript_client_task(entry: &SpecEntry, paths: &OutputPaths<'_>) -> TaskSpec {
    generate_task(
        entry,
        GenerateParts {
            id: generate_id(&entry.name),
            description: format!(
                "Generates Axios client code for {} API by running OpenAPI Generator.",
                entry.api_name
            ),
            generator: generators::TYPESCRIPT_AXIOS,
            output_dir: paths.derive_output_dir(&entry.api_name, entry.is_external),
            options: BTreeMap::new(),
            type_mappings: conventions::typescript_type_mappings(),
            global_properties: BTreeMap::new(),
            packages: None,
        },
    )
}

fn java_client_task(entry: &SpecEntry, paths: &OutputPaths<'_>) -> TaskSpec {
    generate_task(
        entry,
        GenerateParts {
            id: generate_id(&entry.name),
            description: format!(
                "Generates Java client code for {} API by running OpenAPI Generator.",
                entry.api_name
            ),
            generator: generators::JAVA,
            output_dir: paths.derive_output_dir(&entry.api_name, entry.is_external),
            options: conventions::java_client_config_options(),
            type_mappings: conventions::java_type_mappings(),
            global_properties: conventions::java_global_properties(),
            packages: paths.client_packages(&entry.api_name, entry.is_external),
        },
    )
}

fn server_task(entry: &SpecEntry, paths: &OutputPaths<'_>) -> TaskSpec {
    generate_task(
        entry,
        GenerateParts {
            id: generate_server_id(&entry.name),
            description: "Generates Spring server code by running OpenAPI Generator.".to_string(),
            generator: generators::SPRING,
            output_dir: paths.derive_output_dir(&entry.api_name, false),
            options: conventions::server_config_options(),
            type_mappings: conventions::java_type_mappings(),
            global_properties: conventions::java_global_properties(),
            packages: paths.server_packages(),
        },
    )
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
