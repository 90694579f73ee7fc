//! JSON file backed config store (`<dir>/.<name>.json`)

use super::ConfigStore;
use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores each named config as a hidden JSON file inside one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at the user's home directory
    pub fn new() -> Result<Self> {
        Ok(Self::with_dir(get_home_dir()?))
    }

    /// Create a store rooted at a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the config files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing the named config
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{}.json", name))
    }

    fn read(&self, path: &Path) -> Result<Option<Map<String, Value>>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::config_read(path, e)),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(Error::config_format(format!(
                "{} must contain a JSON object, found {}",
                path.display(),
                json_kind(&other)
            ))),
        }
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Map<String, Value>> {
        let path = self.path_for(name);
        debug!("Loading config from {}", path.display());

        match self.read(&path) {
            Ok(Some(config)) => Ok(config),
            Ok(None) => {
                debug!("Config {} not found, creating it", path.display());
                let config = Map::new();
                self.save(name, &config)?;
                Ok(config)
            }
            Err(e) => {
                warn!("Resetting unreadable config {}: {}", path.display(), e);
                let config = Map::new();
                self.save(name, &config)?;
                Ok(config)
            }
        }
    }

    fn save(&self, name: &str, config: &Map<String, Value>) -> Result<()> {
        let path = self.path_for(name);
        debug!("Saving config to {}", path.display());

        fs::create_dir_all(&self.dir).map_err(|e| Error::config_write(&path, e))?;
        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');
        fs::write(&path, content).map_err(|e| Error::config_write(&path, e))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_NAME;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_temp_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::with_dir(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_path_for_uses_hidden_json_file() {
        let store = JsonFileStore::with_dir("/home/alice");
        assert_eq!(
            store.path_for(DEFAULT_CONFIG_NAME),
            PathBuf::from("/home/alice/.master-cli.json")
        );
    }

    #[test]
    fn test_load_missing_creates_empty_file() {
        let (store, _temp) = create_temp_store();
        let path = store.path_for(DEFAULT_CONFIG_NAME);
        assert!(!path.exists());

        let config = store.load(DEFAULT_CONFIG_NAME).unwrap();

        assert!(config.is_empty());
        assert!(path.exists());
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({}));
    }

    #[test]
    fn test_save_then_load() {
        let (store, _temp) = create_temp_store();
        let mut config = Map::new();
        config.insert("github".to_string(), json!({ "name": "master-style" }));

        store.save(DEFAULT_CONFIG_NAME, &config).unwrap();
        let loaded = store.load(DEFAULT_CONFIG_NAME).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_corrupt_file_resets_it() {
        let (store, _temp) = create_temp_store();
        let path = store.path_for(DEFAULT_CONFIG_NAME);
        fs::write(&path, "{ not json").unwrap();

        let config = store.load(DEFAULT_CONFIG_NAME).unwrap();

        assert!(config.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn test_load_non_object_resets_it() {
        let (store, _temp) = create_temp_store();
        fs::write(store.path_for("list"), "[1, 2]").unwrap();

        let config = store.load("list").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::with_dir(temp_dir.path().join("nested"));

        store.save("cfg", &Map::new()).unwrap();
        assert!(temp_dir.path().join("nested/.cfg.json").exists());
    }

    #[test]
    fn test_save_failure_names_the_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = JsonFileStore::with_dir(&blocker);

        let err = store.save("cfg", &Map::new()).unwrap_err();

        match err {
            Error::ConfigWrite { path, .. } => assert_eq!(path, blocker.join(".cfg.json")),
            other => panic!("expected ConfigWrite, got {:?}", other),
        }
    }
}
