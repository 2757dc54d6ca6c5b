// src/config/mod.rs

//! Configuration loading and validation for watchsup.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge CLI overrides (`loader.rs`).
//! - Validate values, apply defaults, expand templates (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_with_overrides};
pub use model::{
    ConfigFile, ProgramConfig, RawConfigFile, RawProgramSection, RawWatchSection, WatchConfig,
};
