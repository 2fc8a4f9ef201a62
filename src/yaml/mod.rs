//! YAML parsing helpers

pub mod diagnostics;

pub use diagnostics::{parse_yaml, YamlSyntaxError};
