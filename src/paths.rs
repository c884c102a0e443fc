//! Canonical locations derived from project topology and resolved config.
//!
//! Centralizing path and package construction keeps every step pointing at
//! the same directories when the layout evolves.
use crate::config::ResolvedConfig;
use crate::conventions::{
    Pipeline, AGGREGATOR_MODULE, DOC_MODULE, DOC_SPEC_REL, JAVA_SOURCE_REL, OPENAPI_MODULE,
    RESOURCES_REL,
};
use crate::topology::ProjectTopology;
use std::path::{Path, PathBuf};

/// Return the `src/main/resources` directory of a module.
pub fn resources_dir(module_dir: &Path) -> PathBuf {
    module_dir.join(RESOURCES_REL)
}

/// Directories the resolver reads specs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecRoots {
    /// Multi-spec layout: one `openapi` module per service plus a shared
    /// module under the aggregator for external APIs.
    Modules {
        modules_dir: PathBuf,
        external_resources: PathBuf,
        /// Consuming project name; selects the `product`/`management` variant.
        variant: String,
    },
    /// Single-spec layout: a `doc` module next to the consuming project.
    Doc { spec_dir: PathBuf },
}

impl SpecRoots {
    pub fn for_project(topology: &ProjectTopology, pipeline: Pipeline) -> Self {
        match pipeline {
            Pipeline::Client => {
                let modules_dir = topology.modules_dir().to_path_buf();
                let external_resources =
                    resources_dir(&modules_dir.join(AGGREGATOR_MODULE).join(OPENAPI_MODULE));
                SpecRoots::Modules {
                    modules_dir,
                    external_resources,
                    variant: topology.project_name().to_string(),
                }
            }
            Pipeline::Server => SpecRoots::Doc {
                spec_dir: topology.parent_dir().join(DOC_MODULE).join(DOC_SPEC_REL),
            },
        }
    }

    /// Resources directory of a service's `openapi` module.
    ///
    /// Only meaningful for the multi-spec layout; the doc layout has a single
    /// spec directory and returns it unchanged.
    pub fn service_resources(&self, service: &str) -> PathBuf {
        match self {
            SpecRoots::Modules { modules_dir, .. } => {
                resources_dir(&modules_dir.join(service).join(OPENAPI_MODULE))
            }
            SpecRoots::Doc { spec_dir } => spec_dir.clone(),
        }
    }

    /// Directory explicit external paths are relative to.
    pub fn external_base(&self) -> &Path {
        match self {
            SpecRoots::Modules {
                external_resources, ..
            } => external_resources,
            SpecRoots::Doc { spec_dir } => spec_dir,
        }
    }

    /// Directory scanned for external specs when none are configured.
    pub fn external_scan_root(&self) -> PathBuf {
        match self {
            SpecRoots::Modules {
                external_resources,
                variant,
                ..
            } => external_resources.join(variant).join("external"),
            SpecRoots::Doc { spec_dir } => spec_dir.join("external"),
        }
    }
}

/// Generated package names for one generate step.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageNames {
    pub invoker_package: String,
    pub api_package: String,
    pub model_package: String,
}

impl PackageNames {
    fn under(package: String) -> Self {
        Self {
            invoker_package: package.clone(),
            model_package: format!("{package}.models"),
            api_package: package,
        }
    }
}

/// Output locations and packages for a resolved config.
#[derive(Debug, Clone)]
pub struct OutputPaths<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> OutputPaths<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Output directory for an API's generated code.
    ///
    /// The multi-spec pipeline gives each API its own subdirectory; the
    /// single-spec pipeline writes everything into the output root.
    pub fn derive_output_dir(&self, api_name: &str, is_external: bool) -> PathBuf {
        match self.config.pipeline {
            Pipeline::Client => {
                let scope = if is_external { "external" } else { "internal" };
                self.config.output_root.join(scope).join(api_name)
            }
            Pipeline::Server => self.config.output_root.clone(),
        }
    }

    /// Source root registered for compilation.
    pub fn source_root(&self) -> PathBuf {
        match self.config.pipeline {
            Pipeline::Client => self.config.output_root.clone(),
            Pipeline::Server => self.config.output_root.join(JAVA_SOURCE_REL),
        }
    }

    /// Packages for the server variant, if the pipeline has a base package.
    pub fn server_packages(&self) -> Option<PackageNames> {
        let base = self.config.base_package.as_deref()?;
        Some(PackageNames::under(format!("{base}.openapi.apis")))
    }

    /// Packages for a client variant, if the pipeline has a base package.
    pub fn client_packages(&self, api_name: &str, is_external: bool) -> Option<PackageNames> {
        let base = self.config.base_package.as_deref()?;
        let package = if is_external {
            format!(
                "{base}.openapi.clients.external.{}",
                api_name.to_lowercase()
            )
        } else {
            format!("{base}.openapi.clients.internal")
        };
        Some(PackageNames::under(package))
    }
}
