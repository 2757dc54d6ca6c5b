// tests/integration/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::{NamedTempFile, tempdir};
use watchsup::config::{RawConfigFile, load_and_validate, load_with_overrides};
use watchsup::errors::SupervisorError;
use watchsup::types::LaunchStrategy;
use watchsup_test_utils::builders::ConfigFileBuilder;

#[test]
fn full_config_file_is_parsed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Watchsup.toml");
    std::fs::write(
        &path,
        r#"
[watch]
root = "src"
suffix = ".rs"
interval = "250ms"

[program]
name = "server"
strategy = "run"
run_cmd = "cargo run --bin {program}"
grace_period = "2s"
"#,
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.watch.root, dir.path().join("src"));
    assert_eq!(cfg.watch.suffix, ".rs");
    assert_eq!(cfg.watch.interval, Duration::from_millis(250));
    assert_eq!(cfg.program.name, "server");
    assert_eq!(cfg.program.strategy, LaunchStrategy::Run);
    assert_eq!(cfg.program.run_cmd, "cargo run --bin server");
    assert_eq!(cfg.program.grace_period, Duration::from_secs(2));
}

#[test]
fn cli_overrides_win_over_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[watch]
suffix = ".go"
interval = "3s"

[program]
name = "wiki"
"#
    )
    .unwrap();

    let overrides = ConfigFileBuilder::new("blog")
        .interval("100ms")
        .strategy(LaunchStrategy::Run)
        .raw();

    let cfg = load_with_overrides(Some(file.path()), overrides).unwrap();
    assert_eq!(cfg.program.name, "blog");
    assert_eq!(cfg.program.run_cmd, "go run ./blog.go");
    assert_eq!(cfg.watch.interval, Duration::from_millis(100));
    assert_eq!(cfg.watch.suffix, ".go");
}

#[test]
fn absolute_root_in_file_is_kept() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("conf.toml");
    std::fs::write(
        &path,
        "[watch]\nroot = \"/srv/app\"\n\n[program]\nname = \"app\"\n",
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.watch.root, PathBuf::from("/srv/app"));
}

#[test]
fn missing_explicit_config_is_a_config_error() {
    let dir = tempdir().unwrap();
    let result = load_with_overrides(
        Some(dir.path().join("nope.toml").as_path()),
        ConfigFileBuilder::new("wiki").raw(),
    );

    match result {
        Err(SupervisorError::ConfigError(msg)) => assert!(msg.contains("nope.toml")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn invalid_toml_returns_structured_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[program\nname = ").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(SupervisorError::TomlError(_))
    ));
}

#[test]
fn unknown_strategy_in_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[program]\nname = \"wiki\"\nstrategy = \"compile\"\n").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(SupervisorError::TomlError(_))
    ));
}

#[test]
fn builder_defaults_are_valid() {
    let cfg = ConfigFileBuilder::new("wiki").build();
    assert_eq!(cfg.program.build_cmd, "go build ./wiki.go");

    let raw = RawConfigFile::default();
    assert!(watchsup::config::ConfigFile::try_from(raw).is_err());
}
