//! Shared helper functions for CLI commands
//!
//! Catalog loading, format resolution and the table writers used by more
//! than one command module.

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, Config, Project};

/// Everything a read-only command needs from the project
pub struct CatalogContext {
    pub config: Config,
    pub catalog: Catalog,
}

impl CatalogContext {
    /// Discover the project, layer its config and load the catalog
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let project = Project::resolve(global.project.as_deref())?;
        let config = Config::load(Some(&project));
        let catalog = Catalog::load(&config.catalog_dir(&project))?;

        Ok(Self { config, catalog })
    }

    /// Resolve `--format auto` against the configured default, then `fallback`
    pub fn format(&self, global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
        resolve_format(global.format, self.config.default_format.as_deref(), fallback)
    }
}

/// Pick the effective output format
///
/// An explicit `--format` wins. `auto` defers to the configured default, and
/// an unset or unrecognized default falls back to `fallback`.
pub fn resolve_format(
    requested: OutputFormat,
    configured: Option<&str>,
    fallback: OutputFormat,
) -> OutputFormat {
    if requested != OutputFormat::Auto {
        return requested;
    }
    match configured.and_then(|s| OutputFormat::from_str(s, true).ok()) {
        Some(OutputFormat::Auto) | None => fallback,
        Some(format) => format,
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a dollar amount
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Format a width in inches, e.g. `1"` or `0.75"`
pub fn format_inches(value: f64) -> String {
    format!("{}\"", value)
}

/// Render rows as a markdown table
pub fn markdown_table<R, S>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<S>>,
    S: Into<String>,
{
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.into_iter().map(|cell| -> String { cell.into() }));
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Write rows as CSV to stdout
pub fn write_csv<R, S>(header: &[&str], rows: R) -> Result<()>
where
    R: IntoIterator<Item = Vec<S>>,
    S: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(header).into_diagnostic()?;
    for row in rows {
        writer.write_record(&row).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    Ok(())
}

/// Print `value` as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Print `value` as YAML
pub fn print_yaml<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("Side Release Buckle 1\"", 12), "Side Rele...");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(298.333), "$298.33");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(-1.5), "-$1.50");
    }

    #[test]
    fn test_format_inches() {
        assert_eq!(format_inches(1.0), "1\"");
        assert_eq!(format_inches(0.75), "0.75\"");
    }

    #[test]
    fn test_resolve_format() {
        use OutputFormat::*;
        assert_eq!(resolve_format(Json, Some("yaml"), Tsv), Json);
        assert_eq!(resolve_format(Auto, Some("yaml"), Tsv), Yaml);
        assert_eq!(resolve_format(Auto, Some("MD"), Tsv), Md);
        assert_eq!(resolve_format(Auto, Some("bogus"), Tsv), Tsv);
        assert_eq!(resolve_format(Auto, Some("auto"), Yaml), Yaml);
        assert_eq!(resolve_format(Auto, None, Tsv), Tsv);
    }

    #[test]
    fn test_markdown_table() {
        let table = markdown_table(&["Region", "Total"], vec![vec!["USA", "$1.00"]]);
        assert!(table.contains("| Region | Total |"));
        assert!(table.contains("| USA    | $1.00 |"));
    }
}
