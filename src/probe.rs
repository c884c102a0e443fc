//! Read-only filesystem access used to synthesize default spec entries.
//!
//! Resolution only ever asks two questions of the filesystem, so they sit
//! behind a trait and unit tests can answer them from memory.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory enumeration needed by the config resolver.
pub trait FilesystemProbe {
    /// Names of the immediate subdirectories of `dir`, sorted.
    ///
    /// A missing directory yields an empty list.
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Every file named `file_name` anywhere below `root`, sorted by path.
    ///
    /// A missing root yields an empty list.
    fn find_files(&self, root: &Path, file_name: &str) -> io::Result<Vec<PathBuf>>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FilesystemProbe for FsProbe {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "probe dir does not exist");
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn find_files(&self, root: &Path, file_name: &str) -> io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        if root.is_dir() {
            collect_files(root, file_name, &mut found)?;
        } else {
            tracing::debug!(root = %root.display(), "probe scan root does not exist");
        }
        found.sort();
        Ok(found)
    }
}

fn collect_files(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, file_name, found)?;
        } else if file_type.is_file() && entry.file_name() == file_name {
            found.push(path);
        }
    }
    Ok(())
}

/// In-memory probe holding a fixed set of file paths.
///
/// Directories exist implicitly as ancestors of the registered files.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryProbe {
    files: std::collections::BTreeSet<PathBuf>,
}

#[cfg(test)]
impl MemoryProbe {
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
impl FilesystemProbe for MemoryProbe {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        let names: std::collections::BTreeSet<String> = self
            .files
            .iter()
            .filter_map(|file| file.strip_prefix(dir).ok())
            .filter(|rel| rel.components().count() > 1)
            .filter_map(|rel| rel.components().next())
            .map(|first| first.as_os_str().to_string_lossy().to_string())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn find_files(&self, root: &Path, file_name: &str) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .iter()
            .filter(|file| file.starts_with(root))
            .filter(|file| file.file_name().is_some_and(|name| name == file_name))
            .cloned()
            .collect())
    }
}
