// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSchedulerConfig, SchedulerConfig};
use crate::errors::Result;

/// Load a settings file and return the raw, unvalidated `RawSchedulerConfig`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSchedulerConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawSchedulerConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a settings file and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SchedulerConfig> {
    let raw = load_from_path(&path)?;
    SchedulerConfig::try_from(raw)
}

/// Load from `path` if given, else from [`default_config_path`] if that file
/// exists, else fall back to built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<SchedulerConfig> {
    if let Some(path) = path {
        return load_and_validate(path);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!(path = ?default_path, "config: loading default settings file");
        return load_and_validate(default_path);
    }

    Ok(SchedulerConfig::default())
}

/// `RoadmapSched.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("RoadmapSched.toml")
}
