use super::DeclaredConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Load declared config from a JSON file.
pub fn load_declared(path: &Path) -> Result<DeclaredConfig, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load declared config, treating a missing file as "no overrides".
pub fn load_declared_optional(path: &Path) -> Result<DeclaredConfig, ConfigError> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(DeclaredConfig::default());
    }
    load_declared(path)
}
