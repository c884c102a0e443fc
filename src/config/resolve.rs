//! Merge declared overrides with tree-derived defaults.
//!
//! Resolution is a pure function of the declared config, the project
//! topology and what the probe reports; it never writes.
use super::{keys, non_empty, DeclaredConfig, ResolvedConfig, SpecEntry};
use crate::conventions::{
    Pipeline, AGGREGATOR_MODULE, CLIENT_SPEC_FILE, DEFAULT_OUTPUT_REL,
    DEFAULT_SERVER_INTERNAL_SPEC, GENERATE_ALL_TASK, ROOT_NAMESPACE, SINGLE_INTERNAL_ENTRY,
};
use crate::error::ConfigError;
use crate::graph::{generate_id, generate_server_id, validate_id};
use crate::paths::SpecRoots;
use crate::probe::FilesystemProbe;
use crate::topology::{package_segment, ProjectTopology};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Resolve declared config into frozen spec entries and output locations.
pub fn resolve(
    declared: &DeclaredConfig,
    topology: &ProjectTopology,
    probe: &dyn FilesystemProbe,
) -> Result<ResolvedConfig, ConfigError> {
    let pipeline = declared.pipeline.unwrap_or_default();
    check_supported_keys(declared, pipeline)?;
    let roots = SpecRoots::for_project(topology, pipeline);

    let internal_entries = match pipeline {
        Pipeline::Client => resolve_module_entries(declared, &roots, probe)?,
        Pipeline::Server => vec![resolve_single_entry(declared, &roots)],
    };
    let external_entries = resolve_external_entries(declared, pipeline, &roots, probe)?;
    check_unique_step_ids(pipeline, &internal_entries, &external_entries)?;

    let output_root = match non_empty(declared.output_dir.as_deref()) {
        Some(dir) => topology.project_dir().join(dir),
        None => topology.project_dir().join(DEFAULT_OUTPUT_REL),
    };

    let base_package = match pipeline {
        Pipeline::Client => None,
        Pipeline::Server => Some(resolve_base_package(declared, topology)?),
    };

    tracing::debug!(
        pipeline = %pipeline,
        internal = internal_entries.len(),
        external = external_entries.len(),
        output_root = %output_root.display(),
        "resolved openapi config"
    );

    Ok(ResolvedConfig {
        pipeline,
        internal_entries,
        external_entries,
        output_root,
        base_package,
    })
}

fn check_supported_keys(declared: &DeclaredConfig, pipeline: Pipeline) -> Result<(), ConfigError> {
    let unsupported = match pipeline {
        Pipeline::Client if is_set(&declared.internal_input_spec_path) => {
            Some("internalInputSpecPath")
        }
        Pipeline::Client if is_set(&declared.base_package) => Some("basePackage"),
        Pipeline::Server if !declared.internal_input_spec_paths.is_empty() => {
            Some("internalInputSpecPaths")
        }
        _ => None,
    };
    match unsupported {
        Some(key) => Err(ConfigError::UnsupportedKey {
            key,
            pipeline: pipeline.as_str(),
        }),
        None => Ok(()),
    }
}

fn is_set(value: &Option<String>) -> bool {
    non_empty(value.as_deref()).is_some()
}

/// Internal entries for the multi-spec pipeline.
///
/// Explicit descriptors win; otherwise every module except the aggregator
/// contributes one entry named after its directory.
fn resolve_module_entries(
    declared: &DeclaredConfig,
    roots: &SpecRoots,
    probe: &dyn FilesystemProbe,
) -> Result<Vec<SpecEntry>, ConfigError> {
    let descriptors = if declared.internal_input_spec_paths.is_empty() {
        default_module_descriptors(roots, probe)?
    } else {
        declared.internal_input_spec_paths.clone()
    };

    let mut entries = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        let value = |key: &str| non_empty(descriptor.get(key).map(String::as_str));
        let service_name = value(keys::SERVICE_NAME).ok_or(ConfigError::MissingKey {
            key: keys::SERVICE_NAME,
            index,
        })?;
        let api_name = value(keys::API_NAME).unwrap_or(service_name);
        let path = value(keys::PATH).ok_or(ConfigError::MissingKey {
            key: keys::PATH,
            index,
        })?;
        entries.push(SpecEntry {
            name: api_name.to_string(),
            api_name: api_name.to_string(),
            spec_path: roots.service_resources(service_name).join(path),
            is_external: false,
        });
    }
    Ok(entries)
}

fn default_module_descriptors(
    roots: &SpecRoots,
    probe: &dyn FilesystemProbe,
) -> Result<Vec<BTreeMap<String, String>>, ConfigError> {
    let SpecRoots::Modules {
        modules_dir,
        variant,
        ..
    } = roots
    else {
        return Ok(Vec::new());
    };
    let modules = probe
        .list_dirs(modules_dir)
        .map_err(|source| ConfigError::Read {
            path: modules_dir.clone(),
            source,
        })?;
    let rel_path = format!("{variant}/internal/{CLIENT_SPEC_FILE}");
    Ok(modules
        .into_iter()
        .filter(|module| module != AGGREGATOR_MODULE)
        .map(|module| {
            BTreeMap::from([
                (keys::SERVICE_NAME.to_string(), module.clone()),
                (keys::API_NAME.to_string(), module),
                (keys::PATH.to_string(), rel_path.clone()),
            ])
        })
        .collect())
}

/// The single internal entry of the single-spec pipeline.
fn resolve_single_entry(declared: &DeclaredConfig, roots: &SpecRoots) -> SpecEntry {
    let rel = non_empty(declared.internal_input_spec_path.as_deref())
        .unwrap_or(DEFAULT_SERVER_INTERNAL_SPEC);
    SpecEntry {
        name: SINGLE_INTERNAL_ENTRY.to_string(),
        api_name: SINGLE_INTERNAL_ENTRY.to_string(),
        spec_path: roots.external_base().join(rel),
        is_external: false,
    }
}

/// External API specs: explicit mapping verbatim, otherwise a scan where each
/// spec file is named after its parent directory.
fn resolve_external_entries(
    declared: &DeclaredConfig,
    pipeline: Pipeline,
    roots: &SpecRoots,
    probe: &dyn FilesystemProbe,
) -> Result<BTreeMap<String, PathBuf>, ConfigError> {
    if !declared.external_input_spec_paths.is_empty() {
        return explicit_external_entries(declared, roots);
    }

    let scan_root = roots.external_scan_root();
    let found = probe
        .find_files(&scan_root, pipeline.spec_file_name())
        .map_err(|source| ConfigError::Read {
            path: scan_root.clone(),
            source,
        })?;

    let mut external = BTreeMap::new();
    // Sorted scan order makes the last-write-wins tie-break reproducible.
    for spec_path in found {
        let Some(api_name) = parent_dir_name(&spec_path) else {
            continue;
        };
        if let Some(previous) = external.insert(api_name.clone(), spec_path.clone()) {
            tracing::warn!(
                api = %api_name,
                previous = %previous.display(),
                chosen = %spec_path.display(),
                "external API name discovered twice, keeping the later path"
            );
        }
    }
    Ok(external)
}

/// Trimmed names and paths from `externalInputSpecPaths`; blanks are errors.
fn explicit_external_entries(
    declared: &DeclaredConfig,
    roots: &SpecRoots,
) -> Result<BTreeMap<String, PathBuf>, ConfigError> {
    let mut external = BTreeMap::new();
    for (api_name, rel) in &declared.external_input_spec_paths {
        let api_name = non_empty(Some(api_name.as_str())).ok_or(ConfigError::BlankExternalName)?;
        let rel = non_empty(Some(rel.as_str()))
            .ok_or_else(|| ConfigError::MissingExternalPath(api_name.to_string()))?;
        let spec_path = roots.external_base().join(rel);
        if external.insert(api_name.to_string(), spec_path).is_some() {
            return Err(ConfigError::DuplicateEntry(api_name.to_string()));
        }
    }
    Ok(external)
}

fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
}

/// Every step id the graph will derive from the entries must be distinct.
fn check_unique_step_ids(
    pipeline: Pipeline,
    internal: &[SpecEntry],
    external: &BTreeMap<String, PathBuf>,
) -> Result<(), ConfigError> {
    let mut taken = BTreeSet::from([GENERATE_ALL_TASK.to_string()]);
    let entries = internal
        .iter()
        .map(|entry| (entry.name.as_str(), false))
        .chain(external.keys().map(|name| (name.as_str(), true)));
    for (name, is_external) in entries {
        let mut ids = vec![validate_id(name), generate_id(name)];
        if pipeline == Pipeline::Server && !is_external {
            ids.push(generate_server_id(name));
        }
        for id in ids {
            if !taken.insert(id) {
                return Err(ConfigError::DuplicateEntry(name.to_string()));
            }
        }
    }
    Ok(())
}

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("valid package regex")
    })
}

/// Declared base package, or `<namespace>.<root>.<domain>.<perspective>`.
fn resolve_base_package(
    declared: &DeclaredConfig,
    topology: &ProjectTopology,
) -> Result<String, ConfigError> {
    if let Some(package) = non_empty(declared.base_package.as_deref()) {
        if !package_pattern().is_match(package) {
            return Err(ConfigError::InvalidPackage(package.to_string()));
        }
        return Ok(package.to_string());
    }
    Ok(format!(
        "{ROOT_NAMESPACE}.{}.{}.{}",
        package_segment(topology.root_name()),
        package_segment(topology.domain()),
        package_segment(topology.perspective()),
    ))
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
