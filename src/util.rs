use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Render a path as a plain argument string for child processes.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let parent = path.parent().unwrap_or(Path::new(""));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
