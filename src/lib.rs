//! SQT: Strap Quote Toolkit
//!
//! Landed-cost quoting for custom webbing straps across manufacturing
//! regions, driven by plain-text YAML catalogs of webbing, hardware and
//! regional pricing rules.

pub mod cli;
pub mod core;
pub mod entities;
pub mod pricing;
pub mod yaml;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Logs go to stderr so they never mix with command output. `RUST_LOG`
/// overrides the level chosen by `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "sqt=debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
