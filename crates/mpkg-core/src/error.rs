//! Error types for mpkg-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using mpkg-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for mpkg
#[derive(Error, Debug)]
pub enum Error {
    /// Config file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be written
    #[error("Failed to write config file {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config content is not a JSON object
    #[error("Invalid config format: {message}")]
    ConfigFormat { message: String },

    /// No home directory could be determined
    #[error("Could not determine home directory")]
    HomeDirNotFound,

    /// External command could not be started
    #[error("Failed to run '{program}': {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a config read error
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create a config write error
    pub fn config_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a config format error
    pub fn config_format(message: impl Into<String>) -> Self {
        Self::ConfigFormat {
            message: message.into(),
        }
    }

    /// Create a process spawn error
    pub fn process_spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::ProcessSpawn {
            program: program.into(),
            source,
        }
    }
}
