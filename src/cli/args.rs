//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, hardware::HardwareCommands, init::InitArgs, price::PriceArgs,
    quote::QuoteArgs, rules::RulesCommands, validate::ValidateArgs, webbing::WebbingCommands,
};

#[derive(Parser)]
#[command(name = "sqt")]
#[command(author, version, about = "Strap Quote Toolkit")]
#[command(
    long_about = "Quote custom webbing straps across manufacturing regions from plain-text YAML catalogs."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .sqt/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new SQT project with a sample catalog
    Init(InitArgs),

    /// Quote a strap in every manufacturing region
    Quote(QuoteArgs),

    /// Flat single-region price for a quick strap build
    Price(PriceArgs),

    /// Browse the webbing catalog
    #[command(subcommand)]
    Webbing(WebbingCommands),

    /// Browse the hardware catalog
    #[command(subcommand)]
    Hardware(HardwareCommands),

    /// Browse regional pricing rules
    #[command(subcommand)]
    Rules(RulesCommands),

    /// Validate catalog files and cross-record consistency
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Aligned columns for the terminal
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
