//! mpkg CLI - Master package maintenance
//!
//! This is the main entry point for the mpkg command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use mpkg_core::JsonFileStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Package(cmd) => commands::package::run(cmd).await,
        Commands::Config(cmd) => {
            let store = match cli.home {
                Some(dir) => JsonFileStore::with_dir(dir),
                None => JsonFileStore::new()?,
            };
            commands::config::run(cmd, &store)
        }
    }
}

/// Crates whose logs follow `-v`/`-q`; everything else stays at `warn`
const LOG_TARGETS: [&str; 3] = ["mpkg", "mpkg_core", "mpkg_package"];

/// Initialize tracing with appropriate verbosity
///
/// Without `-v`/`-q`, `RUST_LOG` wins when it is set.
fn init_tracing(verbose: u8, quiet: bool) {
    let directives = log_directives(verbose, quiet);
    let filter = if verbose == 0 && !quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives))
    } else {
        EnvFilter::new(&directives)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn log_directives(verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let mut directives = vec![if quiet { "error" } else { "warn" }.to_string()];
    directives.extend(LOG_TARGETS.iter().map(|target| format!("{}={}", target, level)));
    directives.join(",")
}
