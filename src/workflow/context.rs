use crate::cli::ProjectArgs;
use crate::config::{self, non_empty, DeclaredConfig, ResolvedConfig};
use crate::conventions::CONFIG_FILE_NAME;
use crate::graph::{build_task_graph, TaskGraph};
use crate::probe::FsProbe;
use crate::topology::ProjectTopology;
use anyhow::{Context, Result};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Everything one invocation knows about the consuming project.
pub(crate) struct GenerationContext {
    project_dir: PathBuf,
    config_path: PathBuf,
    declared: DeclaredConfig,
    topology: OnceCell<ProjectTopology>,
}

impl GenerationContext {
    /// Load declared config for the project and layer CLI overrides on top.
    pub(crate) fn load(args: &ProjectArgs) -> Result<Self> {
        let project_dir = args
            .project
            .canonicalize()
            .with_context(|| format!("resolve project dir {}", args.project.display()))?;

        let (config_path, mut declared) = match &args.config {
            Some(path) => (path.clone(), config::load_declared(path)?),
            None => {
                let path = project_dir.join(CONFIG_FILE_NAME);
                let declared = config::load_declared_optional(&path)?;
                (path, declared)
            }
        };
        apply_overrides(&mut declared, args);
        tracing::debug!(
            project = %project_dir.display(),
            config = %config_path.display(),
            "loaded project context"
        );

        Ok(Self {
            project_dir,
            config_path,
            declared,
            topology: OnceCell::new(),
        })
    }

    pub(crate) fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Topology is derived on first use and cached for the context's lifetime.
    pub(crate) fn topology(&self) -> Result<&ProjectTopology> {
        if let Some(topology) = self.topology.get() {
            return Ok(topology);
        }
        let topology = ProjectTopology::from_project_dir(&self.project_dir)?;
        Ok(self.topology.get_or_init(|| topology))
    }

    pub(crate) fn resolve(&self) -> Result<ResolvedConfig> {
        let resolved = config::resolve(&self.declared, self.topology()?, &FsProbe)
            .with_context(|| format!("resolve {}", self.config_path.display()))?;
        tracing::debug!(
            pipeline = %resolved.pipeline,
            internal = resolved.internal_entries.len(),
            external = resolved.external_entries.len(),
            "resolved spec entries"
        );
        Ok(resolved)
    }

    pub(crate) fn resolve_graph(&self) -> Result<(ResolvedConfig, TaskGraph)> {
        let resolved = self.resolve()?;
        let graph = build_task_graph(&resolved);
        Ok((resolved, graph))
    }
}

fn apply_overrides(declared: &mut DeclaredConfig, args: &ProjectArgs) {
    if let Some(pipeline) = args.pipeline {
        declared.pipeline = Some(pipeline);
    }
    if let Some(output_dir) = non_empty(args.output_dir.as_deref()) {
        declared.output_dir = Some(output_dir.to_string());
    }
    if let Some(base_package) = non_empty(args.base_package.as_deref()) {
        declared.base_package = Some(base_package.to_string());
    }
}
