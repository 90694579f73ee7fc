//! Shared utility functions for mpkg crates

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Environment variable overriding the directory that holds the config file
pub const HOME_ENV: &str = "MPKG_HOME";

/// Get the user's home directory
///
/// Resolution order: `MPKG_HOME`, then `HOME`, then `dirs::home_dir()`.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Some(home) = non_empty_env(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }

    if let Some(home) = non_empty_env("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or(Error::HomeDirNotFound)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
