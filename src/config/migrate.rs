//! Configuration file upgrades.
//!
//! Older config files may lack keys added in later releases. Loading still
//! works thanks to serde defaults, but `config --check` reports the gaps and
//! `config --migrate` writes them back with their default values.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry.
pub const KNOWN_KEYS: [&str; 6] = [
    "database",
    "data_dir",
    "accounts_file",
    "host",
    "port",
    "readings_capacity",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let yaml: Value = serde_yaml::from_str(&content)?;

    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

/// Return the known keys that are missing from the config file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;

    Ok(KNOWN_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(*k))
        .collect())
}

/// Fill missing keys with their defaults, preserving every value already set.
///   Returns:
///   Ok(true)  → file updated
///   Ok(false) → no change needed
pub fn migrate_config_file(path: &Path) -> AppResult<bool> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        return Ok(false);
    }

    let mut map = read_mapping(path)?;
    let defaults = match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => m,
        _ => return Err(AppError::Config("default config is not a mapping".into())),
    };

    for key in missing {
        let key = Value::String(key.to_string());
        if let Some(v) = defaults.get(&key) {
            map.insert(key, v.clone());
        }
    }

    let serialized = serde_yaml::to_string(&Value::Mapping(map))?;
    fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_and_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rtaskmeter.conf");
        fs::write(&path, "database: /tmp/x.sqlite\nport: 9100\n").unwrap();

        let missing = missing_keys(&path).unwrap();
        assert_eq!(
            missing,
            vec!["data_dir", "accounts_file", "host", "readings_capacity"]
        );

        assert!(migrate_config_file(&path).unwrap());
        assert!(missing_keys(&path).unwrap().is_empty());

        let cfg: Config = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.readings_capacity, 1440);

        assert!(!migrate_config_file(&path).unwrap());
    }
}
