// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    ConfigFile, DEFAULT_BUILD_CMD, DEFAULT_EXECUTABLE, DEFAULT_GRACE_PERIOD, DEFAULT_INTERVAL,
    DEFAULT_RUN_CMD, DEFAULT_SUFFIX, PROGRAM_PLACEHOLDER, ProgramConfig, RawConfigFile,
    RawProgramSection, RawWatchSection, WatchConfig,
};
use crate::errors::{Result, SupervisorError};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SupervisorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let watch = resolve_watch(raw.watch)?;
        let program = resolve_program(raw.program)?;
        Ok(ConfigFile::new_unchecked(watch, program))
    }
}

fn resolve_watch(raw: RawWatchSection) -> Result<WatchConfig> {
    let suffix = raw.suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string());
    if suffix.is_empty() {
        return Err(SupervisorError::ConfigError(
            "[watch].suffix must not be empty".to_string(),
        ));
    }

    let interval = resolve_duration(
        "[watch].interval",
        raw.interval.as_deref().unwrap_or(DEFAULT_INTERVAL),
    )?;
    if interval.is_zero() {
        return Err(SupervisorError::ConfigError(
            "[watch].interval must be greater than zero".to_string(),
        ));
    }

    Ok(WatchConfig {
        root: raw.root.unwrap_or_else(|| PathBuf::from(".")),
        suffix,
        interval,
    })
}

fn resolve_program(raw: RawProgramSection) -> Result<ProgramConfig> {
    let name = match raw.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            return Err(SupervisorError::ConfigError(
                "[program].name must be set (in the config file or via --program)".to_string(),
            ));
        }
    };

    let build_cmd = expand_template(
        "[program].build_cmd",
        raw.build_cmd.as_deref().unwrap_or(DEFAULT_BUILD_CMD),
        &name,
    )?;
    let run_cmd = expand_template(
        "[program].run_cmd",
        raw.run_cmd.as_deref().unwrap_or(DEFAULT_RUN_CMD),
        &name,
    )?;
    let executable = expand_template(
        "[program].executable",
        raw.executable.as_deref().unwrap_or(DEFAULT_EXECUTABLE),
        &name,
    )?;

    let grace_period = resolve_duration(
        "[program].grace_period",
        raw.grace_period.as_deref().unwrap_or(DEFAULT_GRACE_PERIOD),
    )?;

    Ok(ProgramConfig {
        name,
        strategy: raw.strategy.unwrap_or_default(),
        build_cmd,
        run_cmd,
        executable: PathBuf::from(executable),
        grace_period,
    })
}

fn expand_template(field: &str, template: &str, name: &str) -> Result<String> {
    if template.trim().is_empty() {
        return Err(SupervisorError::ConfigError(format!(
            "{field} must not be empty"
        )));
    }
    Ok(template.replace(PROGRAM_PLACEHOLDER, name))
}

fn resolve_duration(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| SupervisorError::ConfigError(format!("{field}: {e}")))
}
