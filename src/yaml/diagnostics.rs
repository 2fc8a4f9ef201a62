//! Catalog YAML errors rendered as source-annotated diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A catalog file that failed to parse, pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(sqt::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it came from
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help: catalog_help(&message),
            message,
        }
    }

    /// The underlying parser message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Deserialize `source` as `T`, reporting failures against `filename`
pub fn parse_yaml<T: DeserializeOwned>(source: &str, filename: &str) -> Result<T, YamlSyntaxError> {
    serde_yml::from_str(source).map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename))
}

/// Byte offset of a 1-based line/column position, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let line_len = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .map_or(0, str::len);
    (line_start + column.saturating_sub(1).min(line_len)).min(source.len())
}

/// Suggestions for the mistakes people make when hand-editing catalogs
fn catalog_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("unknown variant") && msg.contains("usa") {
        return Some(
            "Regions are lowercase: usa, mexico, taiwan, vietnam, cambodia, china".to_string(),
        );
    }
    if msg.contains("unknown variant") && msg.contains("buckle") {
        return Some("Hardware category must be buckle, ring, slider, snap, or other".to_string());
    }
    if msg.contains("price tier key") {
        return Some("Price tier keys are minimum quantities, e.g. \"1\": 0.45 and \"500\": 0.38".to_string());
    }
    if msg.contains("missing field") {
        return Some("Add the missing field; `sqt init` writes complete example records".to_string());
    }
    if msg.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }
    if msg.contains("duplicate") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }
    if msg.contains("invalid type") {
        return Some("Check that numbers are not quoted and lists use '- item' entries.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pricing_rule::PricingRule;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 9), source.len());
    }

    #[test]
    fn test_region_typo_gets_region_help() {
        let source = "region: brazil\nlabor_rate_per_unit: 1\n";
        let err = parse_yaml::<PricingRule>(source, "brazil.yaml").unwrap_err();
        assert!(err.message().contains("unknown variant"));
        assert!(err.help.as_deref().unwrap_or("").contains("lowercase"));
    }

    #[test]
    fn test_missing_field_help() {
        let err = parse_yaml::<PricingRule>("region: usa\n", "usa.yaml").unwrap_err();
        assert!(err.message().contains("missing field"));
        assert!(err.help.is_some());
    }

    #[test]
    fn test_unrelated_message_has_no_help() {
        assert!(catalog_help("something else entirely").is_none());
    }
}
