//! Package manifest (`src/package.json`).

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};

/// Manifest location relative to the package root
pub const MANIFEST_PATH: &str = "src/package.json";

/// A loaded manifest; guaranteed to be an object with a string `name`
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: Utf8PathBuf,
    fields: Map<String, Value>,
}

impl Manifest {
    /// Load `src/package.json` under `package_root`
    pub fn load(package_root: &Utf8Path) -> Result<Self> {
        Self::load_from(&package_root.join(MANIFEST_PATH))
    }

    /// Load a manifest from an explicit path
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::read_failure(path, e))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Utf8Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::invalid_manifest(path, e.to_string()))?;

        let Value::Object(fields) = value else {
            return Err(Error::invalid_manifest(path, "top-level value must be an object"));
        };

        match fields.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => {}
            Some(_) => return Err(Error::invalid_manifest(path, "'name' must be a non-empty string")),
            None => return Err(Error::invalid_manifest(path, "missing required field 'name'")),
        }

        Ok(Self {
            path: path.to_path_buf(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Manifest as a JSON object, as merged into render contexts
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
