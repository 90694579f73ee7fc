//! Config command

use anyhow::{anyhow, Result};
use mpkg_core::{ConfigStore, JsonFileStore, DEFAULT_CONFIG_NAME};
use serde_json::{Map, Value};

use crate::cli::{ConfigCommands, ConfigKeyArgs, ConfigSetArgs, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, store: &JsonFileStore) -> Result<()> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", store.path_for(DEFAULT_CONFIG_NAME).display());
            Ok(())
        }
        ConfigCommands::Show(args) => show(args, store),
        ConfigCommands::Get(args) => get(args, store),
        ConfigCommands::Set(args) => set(args, store),
        ConfigCommands::Unset(args) => unset(args, store),
    }
}

fn show(args: ConfigShowArgs, store: &dyn ConfigStore) -> Result<()> {
    let config = store.load(DEFAULT_CONFIG_NAME)?;

    if args.json {
        return output::json(&config);
    }

    if config.is_empty() {
        output::info("No configuration values set");
        return Ok(());
    }

    output::header("Configuration");
    for (key, value) in &config {
        output::kv(key, &display_value(value));
    }

    Ok(())
}

fn get(args: ConfigKeyArgs, store: &dyn ConfigStore) -> Result<()> {
    let value = lookup(store, &args.key)?;
    println!("{}", display_value(&value));
    Ok(())
}

fn set(args: ConfigSetArgs, store: &dyn ConfigStore) -> Result<()> {
    let value = assign(store, &args.key, &args.value)?;
    output::success(&format!("Set {} = {}", args.key, value));
    Ok(())
}

fn unset(args: ConfigKeyArgs, store: &dyn ConfigStore) -> Result<()> {
    if remove(store, &args.key)? {
        output::success(&format!("Removed {}", args.key));
    } else {
        output::info(&format!("{} was not set", args.key));
    }
    Ok(())
}

fn lookup(store: &dyn ConfigStore, key: &str) -> Result<Value> {
    let config = store.load(DEFAULT_CONFIG_NAME)?;
    config
        .get(key)
        .cloned()
        .ok_or_else(|| anyhow!("Config key not set: {}", key))
}

/// Store `raw` under `key`, as JSON when it parses, else as a string
fn assign(store: &dyn ConfigStore, key: &str, raw: &str) -> Result<Value> {
    let value = parse_value(raw);
    let mut config = store.load(DEFAULT_CONFIG_NAME)?;
    config.insert(key.to_string(), value.clone());
    store.save(DEFAULT_CONFIG_NAME, &config)?;
    Ok(value)
}

/// Remove `key`; `false` if it was not present
fn remove(store: &dyn ConfigStore, key: &str) -> Result<bool> {
    let mut config: Map<String, Value> = store.load(DEFAULT_CONFIG_NAME)?;
    if config.remove(key).is_none() {
        return Ok(false);
    }
    store.save(DEFAULT_CONFIG_NAME, &config)?;
    Ok(true)
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
