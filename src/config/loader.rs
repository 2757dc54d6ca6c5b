// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SupervisorError};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate or
/// apply defaults. A relative `[watch].root` is resolved against the
/// directory containing the file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawConfigFile = toml::from_str(&contents)?;

    if let Some(root) = config.watch.root.take() {
        config.watch.root = Some(resolve_relative_to(path, root));
    }

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    ConfigFile::try_from(raw_config)
}

/// Resolve the effective configuration.
///
/// - `path = Some(p)`: `p` must exist and parse.
/// - `path = None`: [`default_config_path`] is used if it exists; otherwise
///   only built-in defaults apply.
///
/// `overrides` (usually assembled from CLI flags) take precedence over the
/// file before validation runs.
pub fn load_with_overrides(path: Option<&Path>, overrides: RawConfigFile) -> Result<ConfigFile> {
    let base = match path {
        Some(p) => load_from_path(p).map_err(|e| match e {
            SupervisorError::IoError(io) => {
                SupervisorError::ConfigError(format!("cannot read config file {:?}: {io}", p))
            }
            other => other,
        })?,
        None => {
            let default = default_config_path();
            if default.is_file() {
                debug!(path = ?default, "using default config file");
                load_from_path(&default)?
            } else {
                debug!("no config file found; using built-in defaults");
                RawConfigFile::default()
            }
        }
    };

    ConfigFile::try_from(base.overlay(overrides))
}

/// Default config path: `Watchsup.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Watchsup.toml")
}

fn resolve_relative_to(config_path: &Path, root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        return root;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(root),
        _ => root,
    }
}
