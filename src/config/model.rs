// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::LaunchStrategy;

pub const DEFAULT_SUFFIX: &str = ".go";
pub const DEFAULT_INTERVAL: &str = "1s";
pub const DEFAULT_GRACE_PERIOD: &str = "5s";
pub const DEFAULT_BUILD_CMD: &str = "go build ./{program}.go";
pub const DEFAULT_RUN_CMD: &str = "go run ./{program}.go";
pub const DEFAULT_EXECUTABLE: &str = "./{program}";

/// Placeholder replaced by `program.name` in command templates.
pub const PROGRAM_PLACEHOLDER: &str = "{program}";

/// Configuration as read from a TOML file (or assembled from CLI flags).
///
/// ```toml
/// [watch]
/// root = "."
/// suffix = ".go"
/// interval = "1s"
///
/// [program]
/// name = "wiki"
/// strategy = "build"
/// build_cmd = "go build ./{program}.go"
/// ```
///
/// Every field is optional; missing values fall back to the defaults above
/// when the file is turned into a [`ConfigFile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: RawWatchSection,

    #[serde(default)]
    pub program: RawProgramSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWatchSection {
    /// Directory to scan. Relative paths in a config file are resolved
    /// against the directory containing that file.
    pub root: Option<PathBuf>,

    /// Watched-file suffix, e.g. `".go"` or `".rs"`.
    pub suffix: Option<String>,

    /// Polling interval, e.g. `"1s"` or `"500ms"`.
    pub interval: Option<String>,
}

/// `[program]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProgramSection {
    /// Program name substituted for `{program}` in the templates.
    pub name: Option<String>,

    pub strategy: Option<LaunchStrategy>,

    /// Shell command run before each launch with the `build` strategy.
    pub build_cmd: Option<String>,

    /// Shell command started directly with the `run` strategy.
    pub run_cmd: Option<String>,

    /// Executable started after a successful build.
    pub executable: Option<String>,

    /// Time between SIGTERM and SIGKILL when stopping the child.
    pub grace_period: Option<String>,
}

impl RawConfigFile {
    /// Overlay every value set in `other` on top of `self`.
    ///
    /// Used to apply CLI flags over the config file.
    pub fn overlay(mut self, other: RawConfigFile) -> Self {
        fn pick<T>(base: &mut Option<T>, over: Option<T>) {
            if over.is_some() {
                *base = over;
            }
        }

        pick(&mut self.watch.root, other.watch.root);
        pick(&mut self.watch.suffix, other.watch.suffix);
        pick(&mut self.watch.interval, other.watch.interval);

        pick(&mut self.program.name, other.program.name);
        pick(&mut self.program.strategy, other.program.strategy);
        pick(&mut self.program.build_cmd, other.program.build_cmd);
        pick(&mut self.program.run_cmd, other.program.run_cmd);
        pick(&mut self.program.executable, other.program.executable);
        pick(&mut self.program.grace_period, other.program.grace_period);

        self
    }
}

/// Validated, fully resolved configuration.
///
/// Construct via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchConfig,
    pub program: ProgramConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub root: PathBuf,
    pub suffix: String,
    pub interval: Duration,
}

/// Everything needed to (re)launch the supervised program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    pub name: String,
    pub strategy: LaunchStrategy,
    /// Build command with `{program}` already expanded.
    pub build_cmd: String,
    /// Run command with `{program}` already expanded.
    pub run_cmd: String,
    /// Executable path with `{program}` already expanded.
    pub executable: PathBuf,
    pub grace_period: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchConfig, program: ProgramConfig) -> Self {
        Self { watch, program }
    }
}
