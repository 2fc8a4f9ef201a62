//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;

/// SQT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog directory; relative paths resolve against the project root
    pub catalog_dir: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Plies used by `sqt quote` when `--plies` is not given
    pub default_plies: Option<u32>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/sqt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.sqt/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(dir) = std::env::var("SQT_CATALOG_DIR") {
            config.catalog_dir = Some(PathBuf::from(dir));
        }
        if let Ok(format) = std::env::var("SQT_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sqt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog_dir.is_some() {
            self.catalog_dir = other.catalog_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.default_plies.is_some() {
            self.default_plies = other.default_plies;
        }
    }

    /// Resolve the catalog directory for `project`
    pub fn catalog_dir(&self, project: &Project) -> PathBuf {
        match &self.catalog_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => project.root().join(dir),
            None => project.default_catalog_dir(),
        }
    }

    /// Plies to use when the command line does not say
    pub fn plies(&self) -> u32 {
        self.default_plies.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            catalog_dir: Some(PathBuf::from("catalog")),
            default_format: Some("yaml".to_string()),
            default_plies: None,
        };
        base.merge(Config {
            catalog_dir: None,
            default_format: Some("json".to_string()),
            default_plies: Some(2),
        });
        assert_eq!(base.catalog_dir, Some(PathBuf::from("catalog")));
        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.plies(), 2);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = serde_yml::from_str("default_plies: 3\n").unwrap();
        assert_eq!(config.plies(), 3);
        assert!(config.catalog_dir.is_none());
    }

    #[test]
    fn test_catalog_dir_resolution() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();

        let config = Config::default();
        assert_eq!(config.catalog_dir(&project), project.root().join("catalog"));

        let relative = Config {
            catalog_dir: Some(PathBuf::from("data/catalog")),
            ..Default::default()
        };
        assert_eq!(
            relative.catalog_dir(&project),
            project.root().join("data/catalog")
        );

        let absolute = Config {
            catalog_dir: Some(PathBuf::from("/srv/catalog")),
            ..Default::default()
        };
        assert_eq!(absolute.catalog_dir(&project), PathBuf::from("/srv/catalog"));
    }
}
