// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate field
/// values. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Checks `[github]` and `[pipeline]` values.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `explicit` if given; otherwise the default location, where a
/// missing file yields an empty configuration so that everything can come
/// from flags.
///
/// A missing file at an explicitly chosen path is always an error.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let path = default_config_path();
    if !path.exists() {
        debug!(path = ?path, "no config file at default location; using defaults");
        return Ok(ConfigFile::default());
    }
    load_and_validate(path)
}

/// Default config path: `Critpath.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Critpath.toml")
}
