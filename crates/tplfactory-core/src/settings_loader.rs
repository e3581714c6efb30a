//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `TPLFACTORY_ENGINE` | `engine` |
//! | `TPLFACTORY_API_VAR` | `api_var` |
//! | `TPLFACTORY_TEMPLATES_ROOT` | `templates_root` |
//! | `TPLFACTORY_ADMIN_TEMPLATE` | `admin_template` |
//! | `TPLFACTORY_DEBUG` | `debug` |
//! | `TPLFACTORY_LOG_LEVEL` | `log_level` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tplfactory_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/tplfactory.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::FactoryError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values, including
/// individual keys inside `[engines.<id>]` tables.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FactoryError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FactoryError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FactoryError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FactoryError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, FactoryError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FactoryError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FactoryError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a file, picking the format from its extension.
///
/// `.json` files are read as JSON, everything else as TOML. Environment
/// overrides are applied afterwards.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FactoryError> {
    let path = path.as_ref();
    let mut settings = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json_file(path)?,
        _ => from_toml_file(path)?,
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// `TPLFACTORY_DEBUG` accepts "true"/"1"/"yes" as true; anything else is false.
/// `TPLFACTORY_ENGINE` may be set to an empty string to disable engine rendering.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("TPLFACTORY_ENGINE") {
        settings.engine = val.trim().to_string();
    }

    if let Ok(val) = std::env::var("TPLFACTORY_API_VAR") {
        settings.api_var = val;
    }

    if let Ok(val) = std::env::var("TPLFACTORY_TEMPLATES_ROOT") {
        settings.templates_root = PathBuf::from(val);
    }

    if let Ok(val) = std::env::var("TPLFACTORY_ADMIN_TEMPLATE") {
        settings.admin_template = val;
    }

    if let Ok(val) = std::env::var("TPLFACTORY_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("TPLFACTORY_LOG_LEVEL") {
        settings.log_level = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, FactoryError> {
    std::fs::read_to_string(path).map_err(|e| {
        FactoryError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, FactoryError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FactoryError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FactoryError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
