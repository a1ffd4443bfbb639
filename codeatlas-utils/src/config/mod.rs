//! Configuration utilities
//!
//! Loads typed configuration from TOML, JSON or YAML files (format picked by
//! extension) and layers partial files over built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parse configuration text in the given format (`toml`, `json`, `yaml`/`yml`)
fn parse_config<T>(content: &str, format: &str) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    match format {
        "toml" => toml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {}", e))),
        "json" => serde_json::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {}", e))),
        "yml" | "yaml" => serde_yaml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {}", e))),
        other => Err(crate::UtilError::Config(format!(
            "Unsupported config format: {}",
            other
        ))),
    }
}

/// Load a possibly partial config file and merge it over `T::default()`
pub fn load_layered<T>(path: &Path) -> crate::Result<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path)?;
    let overlay: serde_json::Value = parse_config(&content, &extension_of(path))?;

    let mut base = serde_json::to_value(T::default())
        .map_err(|e| crate::UtilError::Serialization(format!("Default serialization error: {}", e)))?;
    merge_json_values(&mut base, overlay);

    serde_json::from_value(base)
        .map_err(|e| crate::UtilError::Config(format!("{}: {}", path.display(), e)))
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Merge two JSON values (second overrides first, objects merge key by key)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}
