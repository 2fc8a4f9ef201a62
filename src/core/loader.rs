//! Catalog record loading
//!
//! Each catalog record lives in its own `.yaml` file. Files are visited in
//! file-name order so that record order, and therefore quote tie-breaking,
//! is stable across machines.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::catalog::CatalogError;
use crate::yaml::parse_yaml;

/// List the record files in a catalog directory, sorted by file name
pub fn record_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::DataUnavailable {
            path: dir.to_path_buf(),
            reason: "directory does not exist".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CatalogError::DataUnavailable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .map_or(false, |e| e == "yaml" || e == "yml")
        {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Read and parse a single record file
pub fn load_record<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::DataUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let filename = path.display().to_string();
    Ok(parse_yaml(&content, &filename)?)
}

/// Load every record in a directory. The first unreadable or malformed file
/// fails the whole load.
pub fn load_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, CatalogError> {
    let records = record_files(dir)?
        .iter()
        .map(|path| load_record(path))
        .collect::<Result<Vec<T>, _>>()?;
    tracing::debug!(dir = %dir.display(), count = records.len(), "loaded catalog records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pricing_rule::PricingRule;
    use tempfile::tempdir;

    const USA_RULE: &str = "region: usa\nlabor_rate_per_unit: 0.2\ntooling_base: 50\n\
tooling_per_hardware_type: 25\nshipping_rate_per_lb: 0.1\nshipping_base: 20\n\
lead_time_weeks_min: 2\nlead_time_weeks_max: 4\nmoq: 100\n";

    #[test]
    fn test_missing_dir_is_data_unavailable() {
        let result = record_files(Path::new("/nonexistent/catalog/pricing"));
        assert!(matches!(result, Err(CatalogError::DataUnavailable { .. })));
    }

    #[test]
    fn test_record_files_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), USA_RULE).unwrap();
        fs::write(dir.path().join("a.yml"), USA_RULE).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let files = record_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yml", "b.yaml"]);
    }

    #[test]
    fn test_load_all_parses_records() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("usa.yaml"), USA_RULE).unwrap();

        let rules: Vec<PricingRule> = load_all(dir.path()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].moq, 100);
    }

    #[test]
    fn test_load_all_fails_on_malformed_record() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("usa.yaml"), USA_RULE).unwrap();
        fs::write(dir.path().join("zz.yaml"), "region: [unclosed\n").unwrap();

        let result: Result<Vec<PricingRule>, _> = load_all(dir.path());
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_empty_dir_loads_nothing() {
        let dir = tempdir().unwrap();
        let rules: Vec<PricingRule> = load_all(dir.path()).unwrap();
        assert!(rules.is_empty());
    }
}
