//! Render context: the data available to slots, addressed by dotted paths.

use serde::Serialize;
use serde_json::{Map, Value};

/// Key under which the package manifest is merged
pub const PACKAGE_KEY: &str = "package";

/// Top-level mapping that slot paths are resolved against
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build a context from a JSON value; only objects qualify
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Top-level value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Set `package` to the manifest.
    ///
    /// Only the `package` key is touched; any previous `package` value is
    /// replaced wholesale, every other top-level key is left as it was.
    pub fn merge_package(&mut self, manifest: Value) {
        self.0.insert(PACKAGE_KEY.to_string(), manifest);
    }

    /// Walk a dotted path (`package.repository.url`) through nested objects.
    ///
    /// Numeric segments index into arrays (`keywords.0`). `null` counts as
    /// absent.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        (!current.is_null()).then_some(current)
    }

    /// Resolve `path` to display text, falling back to `default`, then to ""
    pub fn lookup(&self, path: &str, default: Option<&str>) -> String {
        match self.resolve(path) {
            Some(value) => stringify(value),
            None => default.unwrap_or_default().to_string(),
        }
    }
}

/// Text form of a value: strings verbatim, everything else as compact JSON
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
