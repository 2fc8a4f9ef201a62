//! Core module - project layout, configuration and catalog loading

pub mod catalog;
pub mod config;
pub mod loader;
pub mod project;
pub mod validate;

pub use catalog::{Catalog, CatalogError, HardwareFilter, WebbingFilter};
pub use config::Config;
pub use project::{Project, ProjectError};
pub use validate::{validate_catalog, Severity, ValidationIssue, ValidationReport};
