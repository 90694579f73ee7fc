//! Data file formats.
//!
//! A data file supplies the values a target document is rendered with. It is
//! either strict JSON (`.json`) or a data script (`.js`, see [`script`]),
//! selected purely by extension.

pub mod script;

use crate::error::{Error, Result};
use crate::templates::Context;
use camino::Utf8Path;
use serde_json::Value;
use std::fmt;

/// Data file used when none is given
pub const DEFAULT_DATA_FILE: &str = "master.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Strict JSON
    Json,
    /// Literal-only JavaScript object syntax
    Script,
}

impl DataFormat {
    /// Select the format from the file extension
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFormat`] for anything but `.js` and `.json`.
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        match path.extension() {
            Some("json") => Ok(Self::Json),
            Some("js") => Ok(Self::Script),
            _ => Err(Error::unsupported_format(path.as_str())),
        }
    }

    /// Whether data in this format is rendered against itself before use
    pub fn is_self_templated(self) -> bool {
        matches!(self, Self::Script)
    }

    /// Parse `text` (read from `path`) into a render context
    pub fn evaluate(self, path: &Utf8Path, text: &str) -> Result<Context> {
        match self {
            Self::Json => {
                let value: Value = serde_json::from_str(text)
                    .map_err(|e| Error::invalid_data(path, e.to_string()))?;
                Context::from_value(value)
                    .ok_or_else(|| Error::invalid_data(path, "top-level value must be an object"))
            }
            Self::Script => {
                let value = script::evaluate(text)
                    .map_err(|e| Error::evaluation_failure(path, e.line, e.column, e.message))?;
                Context::from_value(value).ok_or_else(|| {
                    Error::evaluation_failure(path, 1, 1, "data script must evaluate to an object")
                })
            }
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Script => f.write_str("script"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_path() {
        assert_eq!(
            DataFormat::from_path(Utf8Path::new("master.json")).unwrap(),
            DataFormat::Json
        );
        assert_eq!(
            DataFormat::from_path(Utf8Path::new("data/master.js")).unwrap(),
            DataFormat::Script
        );
    }

    #[test]
    fn test_from_path_rejects_other_extensions() {
        for path in ["master.yaml", "master.ts", "master", "master.JSON", ".json"] {
            let err = DataFormat::from_path(Utf8Path::new(path)).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedFormat { .. }),
                "{} should be unsupported",
                path
            );
        }
    }

    #[test]
    fn test_evaluate_json() {
        let ctx = DataFormat::Json
            .evaluate(Utf8Path::new("master.json"), r#"{"name": "demo"}"#)
            .unwrap();
        assert_eq!(ctx.get("name"), Some(&json!("demo")));
    }

    #[test]
    fn test_evaluate_json_rejects_loose_syntax() {
        let err = DataFormat::Json
            .evaluate(Utf8Path::new("master.json"), "{ name: 'demo' }")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData { .. }));
    }

    #[test]
    fn test_evaluate_json_requires_object() {
        let err = DataFormat::Json
            .evaluate(Utf8Path::new("master.json"), "[1]")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData { .. }));
    }

    #[test]
    fn test_evaluate_script() {
        let ctx = DataFormat::Script
            .evaluate(Utf8Path::new("master.js"), "({ name: 'demo', stars: 3 })")
            .unwrap();
        assert_eq!(ctx.get("name"), Some(&json!("demo")));
        assert_eq!(ctx.get("stars"), Some(&json!(3)));
    }

    #[test]
    fn test_evaluate_script_failure_carries_position() {
        let err = DataFormat::Script
            .evaluate(Utf8Path::new("master.js"), "({\n  name: process.env.NAME\n})")
            .unwrap_err();

        match err {
            Error::EvaluationFailure { line, column, .. } => assert_eq!((line, column), (2, 9)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_evaluate_script_requires_object() {
        let err = DataFormat::Script
            .evaluate(Utf8Path::new("master.js"), "['a']")
            .unwrap_err();
        assert!(matches!(err, Error::EvaluationFailure { .. }));
    }
}
