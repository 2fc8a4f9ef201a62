//! Project discovery and structure

use miette::Diagnostic;
use rust_embed::Embed;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::{HARDWARE_DIR, PRICING_DIR, WEBBING_DIR};

/// Marker directory at the project root
pub const PROJECT_DIR: &str = ".sqt";

#[derive(Embed)]
#[folder = "templates/catalog/"]
struct SampleCatalog;

/// Represents an SQT project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .sqt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Discover from `--project` if given, else from the current directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project at `path`, optionally seeded with the sample catalog
    pub fn init(path: &Path, with_samples: bool) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }
        Self::write_structure(root, with_samples)
    }

    /// Initialize even if .sqt/ exists. Existing catalog records are kept;
    /// only missing sample files are written.
    pub fn init_force(path: &Path, with_samples: bool) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(root, with_samples)
    }

    fn write_structure(root: PathBuf, with_samples: bool) -> Result<Self, ProjectError> {
        let project = Self { root };
        let io = |e: std::io::Error| ProjectError::IoError(e.to_string());

        std::fs::create_dir_all(project.root.join(PROJECT_DIR)).map_err(io)?;
        std::fs::write(project.config_path(), Self::default_config()).map_err(io)?;

        let catalog = project.default_catalog_dir();
        for dir in [WEBBING_DIR, HARDWARE_DIR, PRICING_DIR] {
            std::fs::create_dir_all(catalog.join(dir)).map_err(io)?;
        }

        if with_samples {
            for name in SampleCatalog::iter() {
                let target = catalog.join(name.as_ref());
                if target.exists() {
                    continue;
                }
                if let Some(file) = SampleCatalog::get(name.as_ref()) {
                    std::fs::write(&target, file.data.as_ref()).map_err(io)?;
                }
            }
        }

        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# SQT Project Configuration

# Catalog directory, relative to the project root (default: catalog)
# catalog_dir: catalog

# Default output format (auto, yaml, json, tsv, csv, md, id)
# default_format: auto

# Plies used by `sqt quote` when --plies is not given
# default_plies: 1
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .sqt configuration directory
    pub fn sqt_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Path of the project config file
    pub fn config_path(&self) -> PathBuf {
        self.sqt_dir().join("config.yaml")
    }

    /// Catalog directory used when the config does not override it
    pub fn default_catalog_dir(&self) -> PathBuf {
        self.root.join("catalog")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("not an SQT project (searched from {searched_from:?})")]
    #[diagnostic(
        code(sqt::project::not_found),
        help("run `sqt init` to create one, or pass --project PATH")
    )]
    NotFound { searched_from: PathBuf },

    #[error("SQT project already exists at {0:?}")]
    #[diagnostic(
        code(sqt::project::exists),
        help("use `sqt init --force` to restore missing sample records")
    )]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    #[diagnostic(code(sqt::project::io))]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();

        assert!(project.sqt_dir().is_dir());
        assert!(project.config_path().exists());
        assert!(project.root().join("catalog/webbing").is_dir());
        assert!(project.root().join("catalog/hardware").is_dir());
        assert!(project.root().join("catalog/pricing").is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path(), false).unwrap();

        let err = Project::init(tmp.path(), false).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_sample_catalog_loads() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), true).unwrap();

        let catalog = Catalog::load(&project.default_catalog_dir()).unwrap();
        assert!(!catalog.webbing.is_empty());
        assert!(!catalog.hardware.is_empty());
        assert_eq!(catalog.pricing_rules.len(), 6);
    }

    #[test]
    fn test_init_force_keeps_existing_records() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), true).unwrap();
        let edited = project.default_catalog_dir().join("pricing/usa.yaml");
        std::fs::write(&edited, "# edited\n").unwrap();

        Project::init_force(tmp.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&edited).unwrap(), "# edited\n");
    }

    #[test]
    fn test_project_discover_finds_sqt_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path(), false).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_sqt_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
