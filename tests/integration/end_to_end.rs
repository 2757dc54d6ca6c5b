// tests/integration/end_to_end.rs

//! Real filesystem + real processes, Unix only.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use filetime::{FileTime, set_file_mtime};
use tempfile::tempdir;
use tokio::sync::mpsc;

use watchsup::engine::{Supervisor, SupervisorEvent, SupervisorOptions};
use watchsup::exec::CommandBackend;
use watchsup::fs::RealFileSystem;
use watchsup::types::LaunchStrategy;
use watchsup::watch::ChangeDetector;
use watchsup_test_utils::builders::ConfigFileBuilder;
use watchsup_test_utils::{init_tracing, wait_until, with_timeout};

fn start_count(log: &Path) -> usize {
    fs::read_to_string(log)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn touching_a_source_file_restarts_the_program() {
    init_tracing();

    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let source = root.join("main.go");
    fs::write(&source, "package main\n").unwrap();
    set_file_mtime(&source, FileTime::from_unix_time(1_000, 0)).unwrap();

    let cfg = ConfigFileBuilder::new("main")
        .root(&root)
        .interval("20ms")
        .strategy(LaunchStrategy::Run)
        .run_cmd("echo started >> starts.log; exec sleep 30")
        .grace_period("1s")
        .build();

    let detector = ChangeDetector::new(Arc::new(RealFileSystem), cfg.watch.suffix.clone());
    let backend = CommandBackend::new(cfg.program.clone(), root.clone());
    let (tx, rx) = mpsc::channel(4);
    let options = SupervisorOptions {
        root: root.clone(),
        interval: cfg.watch.interval,
    };
    let handle = tokio::spawn(Supervisor::new(detector, backend, options, rx).run());

    let log = root.join("starts.log");
    wait_until(|| start_count(&log) == 1).await;

    set_file_mtime(&source, FileTime::from_unix_time(2_000, 0)).unwrap();
    wait_until(|| start_count(&log) == 2).await;

    tx.send(SupervisorEvent::ShutdownRequested).await.unwrap();
    with_timeout(handle).await.unwrap().unwrap();
    assert_eq!(start_count(&log), 2);
}

#[tokio::test]
async fn bad_executable_does_not_stop_the_loop() {
    init_tracing();

    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let source = root.join("main.go");
    fs::write(&source, "package main\n").unwrap();
    set_file_mtime(&source, FileTime::from_unix_time(1_000, 0)).unwrap();

    // First launch: build succeeds but the executable does not exist.
    // The build writes it on the second attempt.
    let cfg = ConfigFileBuilder::new("app")
        .root(&root)
        .interval("20ms")
        .build_cmd(
            "if [ -f attempted ]; then printf '#!/bin/sh\\necho ok >> ran.log\\nexec sleep 30\\n' > app && chmod +x app; else touch attempted; fi",
        )
        .executable("./app")
        .grace_period("1s")
        .build();

    let detector = ChangeDetector::new(Arc::new(RealFileSystem), cfg.watch.suffix.clone());
    let backend = CommandBackend::new(cfg.program.clone(), root.clone());
    let (tx, rx) = mpsc::channel(4);
    let options = SupervisorOptions {
        root: root.clone(),
        interval: cfg.watch.interval,
    };
    let handle = tokio::spawn(Supervisor::new(detector, backend, options, rx).run());

    wait_until(|| root.join("attempted").exists()).await;
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
    assert!(!handle.is_finished());

    set_file_mtime(&source, FileTime::from_unix_time(2_000, 0)).unwrap();
    let ran = root.join("ran.log");
    wait_until(|| start_count(&ran) == 1).await;

    tx.send(SupervisorEvent::ShutdownRequested).await.unwrap();
    with_timeout(handle).await.unwrap().unwrap();
}
