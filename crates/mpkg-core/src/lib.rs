//! # mpkg-core
//!
//! Core library for the mpkg CLI providing:
//! - The per-user JSON config store (`~/.master-cli.json`)
//! - Running external commands and capturing their output
//! - Home directory resolution shared by every command

pub mod config;
pub mod error;
pub mod process;
pub mod utils;

pub use config::{ConfigStore, JsonFileStore, MemoryStore, DEFAULT_CONFIG_NAME};
pub use error::{Error, Result};
pub use process::{command_available, run_command, CommandOutput};
pub use utils::get_home_dir;
