//! `sqt validate` command - Validate catalog files and consistency

use console::style;
use miette::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::cli::helpers::{print_json, print_yaml, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{HARDWARE_DIR, PRICING_DIR, WEBBING_DIR};
use crate::core::{loader, validate_catalog, Catalog, Config, Project, Severity, ValidationIssue};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Show summary only, don't show individual files
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Debug, Default, Serialize)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
    total_warnings: usize,
}

/// Machine-readable validation outcome
#[derive(Serialize)]
struct ValidationOutput<'a> {
    passed: bool,
    #[serde(flatten)]
    stats: &'a ValidationStats,
    parse_failures: &'a [String],
    issues: &'a [ValidationIssue],
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::resolve(global.project.as_deref())?;
    let config = Config::load(Some(&project));
    let catalog_dir = config.catalog_dir(&project);
    let format = resolve_format(
        global.format,
        config.default_format.as_deref(),
        OutputFormat::Tsv,
    );
    let human = !matches!(format, OutputFormat::Json | OutputFormat::Yaml);
    let show_files = human && !args.summary && !global.quiet;

    let mut stats = ValidationStats::default();
    let mut parse_failures = Vec::new();
    let mut check = FileChecker {
        stats: &mut stats,
        failures: &mut parse_failures,
        show_files,
    };

    if show_files {
        println!(
            "{} Validating catalog at {}\n",
            style("→").blue(),
            style(catalog_dir.display()).cyan()
        );
    }

    let catalog = Catalog {
        webbing: check.load_dir(&catalog_dir.join(WEBBING_DIR)),
        hardware: check.load_dir(&catalog_dir.join(HARDWARE_DIR)),
        pricing_rules: check.load_dir(&catalog_dir.join(PRICING_DIR)),
    };

    let report = validate_catalog(&catalog);
    stats.total_errors += report.errors().count();
    stats.total_warnings += report.warnings().count();
    let passed = parse_failures.is_empty() && report.passes(args.strict);

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output = ValidationOutput {
                passed,
                stats: &stats,
                parse_failures: &parse_failures,
                issues: &report.issues,
            };
            if format == OutputFormat::Json {
                print_json(&output)?;
            } else {
                print_yaml(&output)?;
            }
        }
        _ => {
            if !report.issues.is_empty() && !args.summary {
                println!();
                println!("{}", style("Consistency checks").bold());
                for issue in &report.issues {
                    let mark = match issue.severity {
                        Severity::Error => style("✗").red(),
                        Severity::Warning => style("!").yellow(),
                    };
                    println!("{} {} - {}", mark, style(&issue.record).cyan(), issue.message);
                }
            }
            print_summary(&stats);
        }
    }

    if passed {
        if human && !global.quiet {
            println!(
                "{} Catalog passed validation!",
                style("✓").green().bold()
            );
        }
        Ok(())
    } else if !parse_failures.is_empty() {
        Err(miette::miette!(
            "Validation failed: {} file(s) could not be loaded",
            parse_failures.len()
        ))
    } else if args.strict && report.errors().next().is_none() {
        Err(miette::miette!(
            "Validation failed: {} warning(s) in strict mode",
            stats.total_warnings
        ))
    } else {
        Err(miette::miette!(
            "Validation failed: {} consistency error(s)",
            report.errors().count()
        ))
    }
}

/// Loads records file by file so one bad file does not hide the rest
struct FileChecker<'a> {
    stats: &'a mut ValidationStats,
    failures: &'a mut Vec<String>,
    show_files: bool,
}

impl FileChecker<'_> {
    fn load_dir<T: DeserializeOwned>(&mut self, dir: &Path) -> Vec<T> {
        let files = match loader::record_files(dir) {
            Ok(files) => files,
            Err(e) => {
                self.fail(dir, miette::Report::new(e));
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(files.len());
        for path in files {
            self.stats.files_checked += 1;
            match loader::load_record::<T>(&path) {
                Ok(record) => {
                    self.stats.files_passed += 1;
                    if self.show_files {
                        println!("{} {}", style("✓").green(), path.display());
                    }
                    records.push(record);
                }
                Err(e) => {
                    self.stats.files_failed += 1;
                    self.fail(&path, miette::Report::new(e));
                }
            }
        }
        records
    }

    fn fail(&mut self, path: &Path, report: miette::Report) {
        self.stats.total_errors += 1;
        self.failures.push(path.display().to_string());
        tracing::debug!(path = %path.display(), "validation failed to load");
        if self.show_files {
            println!("{} {}", style("✗").red(), path.display());
            println!("{:?}", report);
        }
    }
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    if stats.total_warnings > 0 {
        println!("  Total warnings: {}", style(stats.total_warnings).yellow());
    }
    println!();
}
