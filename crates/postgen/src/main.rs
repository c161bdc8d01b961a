//! postgen - finishes a freshly generated workshop project
//!
//! Entry point of the command-line interface.

mod cli;
mod commands;
mod output;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Run => commands::run::run(&cli.global()).await,
        Commands::Scaffold => commands::scaffold::run(&cli.global()).await,
        Commands::Branches => commands::branches::run(&cli.global()).await,
        Commands::Publish => commands::publish::run(&cli.global()).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Step progress is logged at info
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
