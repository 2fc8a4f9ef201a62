//! `sqt init` command - Initialize a new SQT project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .sqt/ already exists (existing records are kept)
    #[arg(long)]
    pub force: bool,

    /// Create empty catalog directories without the sample records
    #[arg(long)]
    pub empty: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let with_samples = !args.empty;
    let project = if args.force {
        Project::init_force(&path, with_samples)
    } else {
        Project::init(&path, with_samples)
    };

    match project {
        Ok(project) => {
            tracing::info!(root = %project.root().display(), with_samples, "initialized project");
            if global.quiet {
                return Ok(());
            }
            println!(
                "{} Initialized SQT project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Browse the sample webbing",
                style("sqt webbing list").yellow()
            );
            println!(
                "  {} Quote a strap",
                style("sqt quote -w WEB-NYL-100 -l 24 -n 500").yellow()
            );
            println!(
                "  {} Check the catalog",
                style("sqt validate").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} SQT project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to restore missing sample records",
                style("sqt init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_structure(root: &Path) {
    let entries = [
        ".sqt/",
        ".sqt/config.yaml",
        "catalog/webbing/",
        "catalog/hardware/",
        "catalog/pricing/",
    ];

    for entry in entries {
        if root.join(entry).exists() {
            let prefix = if entry.ends_with('/') { "📁" } else { "📄" };
            println!("  {} {}", prefix, style(entry).dim());
        }
    }
}
