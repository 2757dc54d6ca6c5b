use std::path::Path;

use watchsup::config::{ConfigFile, RawConfigFile};
use watchsup::types::LaunchStrategy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(program: &str) -> Self {
        let mut config = RawConfigFile::default();
        config.program.name = Some(program.to_string());
        Self { config }
    }

    pub fn root(mut self, root: impl AsRef<Path>) -> Self {
        self.config.watch.root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.config.watch.suffix = Some(suffix.to_string());
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.config.watch.interval = Some(interval.to_string());
        self
    }

    pub fn strategy(mut self, strategy: LaunchStrategy) -> Self {
        self.config.program.strategy = Some(strategy);
        self
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.config.program.build_cmd = Some(cmd.to_string());
        self
    }

    pub fn run_cmd(mut self, cmd: &str) -> Self {
        self.config.program.run_cmd = Some(cmd.to_string());
        self
    }

    pub fn executable(mut self, exe: &str) -> Self {
        self.config.program.executable = Some(exe.to_string());
        self
    }

    pub fn grace_period(mut self, grace: &str) -> Self {
        self.config.program.grace_period = Some(grace.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
