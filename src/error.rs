//! Typed errors for configuration and step execution.
//!
//! Configuration errors abort before any step graph exists; step errors are
//! scoped to a single step and reported alongside the others.
use std::path::PathBuf;

/// Fatal configuration problems detected while resolving spec entries.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "missing key: {key} (element {index} of 'internalInputSpecPaths' in the openapi generator config)"
    )]
    MissingKey { key: &'static str, index: usize },

    #[error("spec entry '{0}' collides with the step ids of another entry")]
    DuplicateEntry(String),

    #[error("blank API name in 'externalInputSpecPaths'")]
    BlankExternalName,

    #[error("missing path for external API '{0}' in 'externalInputSpecPaths'")]
    MissingExternalPath(String),

    #[error("config key '{key}' is not supported by the {pipeline} pipeline")]
    UnsupportedKey {
        key: &'static str,
        pipeline: &'static str,
    },

    #[error("invalid basePackage {0:?} (expected dotted identifiers)")]
    InvalidPackage(String),

    #[error("project {} is not inside a modules/ tree", .0.display())]
    OutsideModulesTree(PathBuf),

    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Failures reported by an individual validate or generate step.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("spec not found at {}", .0.display())]
    SpecNotFound(PathBuf),

    #[error("validation failed for {}: {detail}", .spec.display())]
    ValidationFailure { spec: PathBuf, detail: String },

    #[error("generation failed for {}: {detail}", .spec.display())]
    GenerationFailure { spec: PathBuf, detail: String },

    #[error("launch generator '{program}': {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
}
