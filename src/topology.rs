//! Read-only view of where a project sits in the source tree.
//!
//! Every consuming project lives somewhere below a `modules/` directory; the
//! tree root is that directory's parent. Names used for default packages are
//! read off the path segments between `modules/` and the project.
use crate::error::ConfigError;
use std::path::{Component, Path, PathBuf};

/// Directory that anchors the module hierarchy.
pub const MODULES_DIR: &str = "modules";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTopology {
    project_dir: PathBuf,
    modules_dir: PathBuf,
    root_name: String,
    /// Segments from the first directory below `modules/` down to the project.
    segments: Vec<String>,
}

impl ProjectTopology {
    /// Derive the topology of an absolute, normalized project directory.
    pub fn from_project_dir(project_dir: &Path) -> Result<Self, ConfigError> {
        let outside = || ConfigError::OutsideModulesTree(project_dir.to_path_buf());
        let modules_dir = project_dir
            .ancestors()
            .skip(1)
            .find(|dir| dir.file_name().is_some_and(|name| name == MODULES_DIR))
            .ok_or_else(outside)?
            .to_path_buf();
        let root_name = modules_dir
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(outside)?;
        let segments: Vec<String> = project_dir
            .strip_prefix(&modules_dir)
            .map_err(|_| outside())?
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            return Err(outside());
        }
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            modules_dir,
            root_name,
            segments,
        })
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Return the `modules/` directory that contains the project.
    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Name of the tree root directory (the parent of `modules/`).
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Name of the project directory itself.
    pub fn project_name(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or(self.root_name.as_str())
    }

    /// First directory below `modules/`.
    pub fn domain(&self) -> &str {
        &self.segments[0]
    }

    /// Directory that directly contains the project.
    ///
    /// A project placed directly under its domain shares the domain name.
    pub fn perspective(&self) -> &str {
        match self.segments.len() {
            0 | 1 => self.domain(),
            len => &self.segments[len - 2],
        }
    }

    /// Directory that directly contains the project, as a path.
    pub fn parent_dir(&self) -> &Path {
        self.project_dir.parent().unwrap_or(&self.modules_dir)
    }
}

/// Lower-case a directory name and strip hyphens so it can be a package segment.
pub fn package_segment(name: &str) -> String {
    name.replace('-', "").to_lowercase()
}
