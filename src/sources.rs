//! Compilation input registration for generated code.
use crate::config::ResolvedConfig;
use crate::conventions::{Pipeline, JAVA_COMPILE_TASK};
use crate::graph::{TaskGraph, TaskKind};
use crate::paths::OutputPaths;
use serde::Serialize;
use std::path::PathBuf;

/// A generated source root and the steps that must run before it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSet {
    pub root: PathBuf,
    pub built_by: Vec<String>,
    /// Host compile step that consumes the root, when the pipeline has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_task: Option<String>,
}

/// Register the output root as a compilation input built by every generate
/// step of the graph, external APIs included.
pub fn register_source_set(config: &ResolvedConfig, graph: &TaskGraph) -> SourceSet {
    let compile_task = match config.pipeline {
        Pipeline::Client => None,
        Pipeline::Server => Some(JAVA_COMPILE_TASK.to_string()),
    };
    SourceSet {
        root: OutputPaths::new(config).source_root(),
        built_by: graph
            .ids_of_kind(TaskKind::Generate)
            .into_iter()
            .map(str::to_string)
            .collect(),
        compile_task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecEntry;
    use crate::graph::build_task_graph;
    use std::collections::BTreeMap;

    #[test]
    fn server_source_set_is_built_by_all_generate_steps() {
        let config = ResolvedConfig {
            pipeline: Pipeline::Server,
            internal_entries: vec![SpecEntry {
                name: "internal".to_string(),
                api_name: "internal".to_string(),
                spec_path: PathBuf::from("/doc/internal/openapi.yaml"),
                is_external: false,
            }],
            external_entries: BTreeMap::from([
                ("A".to_string(), PathBuf::from("/doc/A.yaml")),
                ("B".to_string(), PathBuf::from("/doc/B.yaml")),
            ]),
            output_root: PathBuf::from("/out"),
            base_package: Some("com.acme".to_string()),
        };
        let graph = build_task_graph(&config);

        let source_set = register_source_set(&config, &graph);
        assert_eq!(source_set.root, PathBuf::from("/out/src/main/java"));
        assert_eq!(source_set.compile_task.as_deref(), Some("compileJava"));
        assert_eq!(
            source_set.built_by,
            vec![
                "generate_internal_server".to_string(),
                "generate_internal".to_string(),
                "generate_A".to_string(),
                "generate_B".to_string(),
            ]
        );
    }
}
