// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{RawConfigFile, RawProgramSection, RawWatchSection};
use crate::types::LaunchStrategy;

/// Command-line arguments for `watchsup`.
///
/// Every option that mirrors a config-file key overrides that key.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchsup",
    version,
    about = "Watch a source tree and rebuild/restart a program when files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Watchsup.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory tree to watch.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Watched-file suffix (e.g. ".go").
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Polling interval (e.g. "1s", "500ms").
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Program name, substituted for `{program}` in command templates.
    #[arg(long, short = 'p', value_name = "NAME")]
    pub program: Option<String>,

    /// Launch strategy.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<LaunchStrategy>,

    /// Build command template (strategy `build`).
    #[arg(long, value_name = "CMD")]
    pub build_cmd: Option<String>,

    /// Run command template (strategy `run`).
    #[arg(long, value_name = "CMD")]
    pub run_cmd: Option<String>,

    /// Executable started after a successful build.
    #[arg(long, value_name = "PATH")]
    pub executable: Option<String>,

    /// Time to wait after SIGTERM before killing the child.
    #[arg(long, value_name = "DURATION")]
    pub grace_period: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHSUP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the effective settings, but don't launch anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The config-file keys set on the command line.
    pub fn overrides(&self) -> RawConfigFile {
        RawConfigFile {
            watch: RawWatchSection {
                root: self.root.clone(),
                suffix: self.suffix.clone(),
                interval: self.interval.clone(),
            },
            program: RawProgramSection {
                name: self.program.clone(),
                strategy: self.strategy,
                build_cmd: self.build_cmd.clone(),
                run_cmd: self.run_cmd.clone(),
                executable: self.executable.clone(),
                grace_period: self.grace_period.clone(),
            },
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
