use clap::Parser;
use miette::Result;
use sqt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` and friends exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    sqt::init_tracing(global.verbose);

    match cli.command {
        Commands::Init(args) => sqt::cli::commands::init::run(args, &global),
        Commands::Quote(args) => sqt::cli::commands::quote::run(args, &global),
        Commands::Price(args) => sqt::cli::commands::price::run(args, &global),
        Commands::Webbing(cmd) => sqt::cli::commands::webbing::run(cmd, &global),
        Commands::Hardware(cmd) => sqt::cli::commands::hardware::run(cmd, &global),
        Commands::Rules(cmd) => sqt::cli::commands::rules::run(cmd, &global),
        Commands::Validate(args) => sqt::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => sqt::cli::commands::completions::run(args),
    }
}
