//! Declared configuration and its resolution into concrete spec entries.
//!
//! Loading reads the user's overrides; resolution merges them with defaults
//! scanned from the source tree and freezes the result.
use crate::conventions::Pipeline;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

mod load;
mod resolve;

pub use load::{load_declared, load_declared_optional};
pub use resolve::resolve;

/// Keys of a single `internalInputSpecPaths` descriptor.
pub mod keys {
    pub const SERVICE_NAME: &str = "serviceName";
    pub const API_NAME: &str = "apiName";
    pub const PATH: &str = "path";
}

/// User overrides, as written in `openapi-generator.json`.
///
/// Every field is optional; absent and empty values fall back to defaults
/// derived from the source tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclaredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Pipeline>,
    /// Multi-spec descriptors with `serviceName`, `apiName` and `path` keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_input_spec_paths: Vec<BTreeMap<String, String>>,
    /// Single-spec internal path, relative to the doc spec directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_input_spec_path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub external_input_spec_paths: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_package: Option<String>,
}

/// One spec backing one generated API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecEntry {
    pub name: String,
    pub api_name: String,
    pub spec_path: PathBuf,
    pub is_external: bool,
}

/// Frozen result of a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub pipeline: Pipeline,
    pub internal_entries: Vec<SpecEntry>,
    /// External API name to spec path, ordered by API name.
    pub external_entries: BTreeMap<String, PathBuf>,
    pub output_root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_package: Option<String>,
}

impl ResolvedConfig {
    /// External entries as spec entries; the API name doubles as entry name.
    pub fn external_spec_entries(&self) -> impl Iterator<Item = SpecEntry> + '_ {
        self.external_entries
            .iter()
            .map(|(api_name, spec_path)| SpecEntry {
                name: api_name.clone(),
                api_name: api_name.clone(),
                spec_path: spec_path.clone(),
                is_external: true,
            })
    }

    /// Internal entries followed by external entries.
    pub fn all_entries(&self) -> Vec<SpecEntry> {
        let mut entries = self.internal_entries.clone();
        entries.extend(self.external_spec_entries());
        entries
    }
}

/// Return the trimmed value when present and non-empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
