//! Error types for mpkg-package

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias using mpkg-package's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Rendering error types
///
/// Every variant is fatal for a render. A slot that resolves to nothing is
/// not an error: it falls back to its default or the empty string.
#[derive(Error, Debug)]
pub enum Error {
    /// Data file extension is neither `.js` nor `.json`
    #[error("Unsupported data file: {path}. Only \".js\" and \".json\" files are supported")]
    UnsupportedFormat { path: String },

    /// Required argument absent or empty
    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    /// Target, manifest or data file could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data-script file did not evaluate to a usable structure
    #[error("Failed to evaluate {path} (line {line}, column {column}): {message}")]
    EvaluationFailure {
        path: Utf8PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// JSON data file is malformed or its root is not an object
    #[error("Invalid data in {path}: {message}")]
    InvalidData { path: Utf8PathBuf, message: String },

    /// Manifest is malformed or lacks a `name`
    #[error("Invalid manifest {path}: {message}")]
    InvalidManifest { path: Utf8PathBuf, message: String },

    /// Rendered output could not be written
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create a missing argument error
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Create a read failure error
    pub fn read_failure(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an evaluation failure error
    pub fn evaluation_failure(
        path: impl Into<Utf8PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::EvaluationFailure {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidData {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid manifest error
    pub fn invalid_manifest(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write failure error
    pub fn write_failure(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
