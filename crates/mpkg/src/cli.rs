//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use mpkg_package::data::DEFAULT_DATA_FILE;
use mpkg_package::render::DEFAULT_TARGET_FILE;

/// mpkg - Maintain Master packages
#[derive(Parser, Debug)]
#[command(name = "mpkg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the per-user config file (default: home directory)
    #[arg(long, global = true, env = "MPKG_HOME")]
    pub home: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Package maintenance
    #[command(subcommand, visible_alias = "p")]
    Package(PackageCommands),

    /// Per-user configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

// Package commands
#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// Render a package document from its manifest and data file
    #[command(visible_alias = "r")]
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Document to render in place
    #[arg(default_value = DEFAULT_TARGET_FILE)]
    pub target: Utf8PathBuf,

    /// Data file (.json or .js)
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    pub data: Utf8PathBuf,

    /// Stage the rendered document with `git add`
    #[arg(long)]
    pub stage: bool,

    /// Print the render report as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,

    /// Show the whole config
    Show(ConfigShowArgs),

    /// Print one value
    Get(ConfigKeyArgs),

    /// Set a value (parsed as JSON when possible, else stored as a string)
    Set(ConfigSetArgs),

    /// Remove a value
    Unset(ConfigKeyArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigKeyArgs {
    /// Top-level key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Top-level key
    pub key: String,

    /// Value to store
    pub value: String,
}
