// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_with_overrides};
use crate::engine::{Supervisor, SupervisorEvent, SupervisorOptions};
use crate::exec::CommandBackend;
use crate::fs::RealFileSystem;
use crate::watch::ChangeDetector;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - change detector over the real filesystem
/// - process backend
/// - Ctrl-C / SIGTERM handling
/// - the supervisor loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_with_overrides(args.config.as_deref(), args.overrides())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    // Canonicalize once so we have a stable base path.
    let root = cfg.watch.root.clone();
    let root: PathBuf = root.canonicalize().unwrap_or(root);

    let detector = ChangeDetector::new(Arc::new(RealFileSystem), cfg.watch.suffix.clone());
    let backend = CommandBackend::new(cfg.program.clone(), root.clone());

    let (tx, rx) = mpsc::channel::<SupervisorEvent>(16);
    spawn_shutdown_listeners(tx);

    let options = SupervisorOptions {
        root,
        interval: cfg.watch.interval,
    };

    Supervisor::new(detector, backend, options, rx).run().await?;
    Ok(())
}

/// Ctrl-C (and SIGTERM on Unix) → graceful shutdown.
fn spawn_shutdown_listeners(tx: mpsc::Sender<SupervisorEvent>) {
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(SupervisorEvent::ShutdownRequested).await;
        });
    }

    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("failed to listen for SIGTERM: {e}");
                return;
            }
        };
        term.recv().await;
        let _ = tx.send(SupervisorEvent::ShutdownRequested).await;
    });

    #[cfg(not(unix))]
    drop(tx);
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(cfg: &ConfigFile) {
    print!("{}", dry_run_report(cfg));
    debug!("dry-run complete (no execution)");
}

fn dry_run_report(cfg: &ConfigFile) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "watchsup dry-run");
    let _ = writeln!(out, "  watch.root = {}", cfg.watch.root.display());
    let _ = writeln!(out, "  watch.suffix = {}", cfg.watch.suffix);
    let _ = writeln!(out, "  watch.interval = {:?}", cfg.watch.interval);
    let _ = writeln!(out);

    let _ = writeln!(out, "program {}:", cfg.program.name);
    let _ = writeln!(out, "  strategy: {}", cfg.program.strategy);
    match cfg.program.strategy {
        types::LaunchStrategy::Build => {
            let _ = writeln!(out, "  build_cmd: {}", cfg.program.build_cmd);
            let _ = writeln!(out, "  executable: {}", cfg.program.executable.display());
        }
        types::LaunchStrategy::Run => {
            let _ = writeln!(out, "  run_cmd: {}", cfg.program.run_cmd);
        }
    }
    let _ = writeln!(out, "  grace_period: {:?}", cfg.program.grace_period);
    out
}
