// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;

use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::watch::{ChangeDetector, ScanResult};

use super::core::SupervisorCore;
use super::{SupervisorCommand, SupervisorEvent, SupervisorOptions};

/// Drives the supervisor core on a polling cadence and delegates process
/// management to a `ProcessBackend`.
///
/// This is the IO shell around `SupervisorCore`: it owns the change detector,
/// the timer, the control channel and the current child handle.
pub struct Supervisor<B: ProcessBackend> {
    core: SupervisorCore,
    detector: ChangeDetector,
    backend: B,
    options: SupervisorOptions,
    event_rx: mpsc::Receiver<SupervisorEvent>,
    child: Option<B::Handle>,
}

impl<B: ProcessBackend> fmt::Debug for Supervisor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .field("options", &self.options)
            .field("child", &self.child)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(
        detector: ChangeDetector,
        backend: B,
        options: SupervisorOptions,
        event_rx: mpsc::Receiver<SupervisorEvent>,
    ) -> Self {
        Self {
            core: SupervisorCore::new(),
            detector,
            backend,
            options,
            event_rx,
            child: None,
        }
    }

    /// Main loop.
    ///
    /// - Records a baseline scan, then launches the child.
    /// - Every `interval`, scans the root and restarts the child on change.
    /// - Exits when a `ShutdownRequested` event arrives or the control
    ///   channel closes, terminating the child first.
    pub async fn run(mut self) -> Result<()> {
        info!(
            root = ?self.options.root,
            suffix = %self.detector.suffix(),
            interval = ?self.options.interval,
            "watchsup supervisor started"
        );

        let baseline = self.detector.scan(&self.options.root);
        debug!(
            tracked = self.detector.state().len(),
            modified = baseline.modified.len(),
            "baseline scan complete"
        );

        if !self.dispatch(SupervisorEvent::Startup).await {
            return Ok(());
        }

        let mut ticker = interval(self.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the baseline already covers it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = self.detector.scan(&self.options.root);
                    if !result.changed() {
                        continue;
                    }
                    report_modified(&result);
                    if !self.dispatch(SupervisorEvent::ChangeDetected).await {
                        break;
                    }
                }

                event = self.event_rx.recv() => {
                    let event = match event {
                        Some(e) => e,
                        None => {
                            info!("control channel closed; shutting down");
                            SupervisorEvent::ShutdownRequested
                        }
                    };
                    if !self.dispatch(event).await {
                        break;
                    }
                }
            }
        }

        info!(restarts = self.core.restarts(), "supervisor exiting");
        Ok(())
    }

    /// Feed an event (and any follow-up events produced by executing its
    /// commands) through the core. Returns whether the loop should continue.
    async fn dispatch(&mut self, event: SupervisorEvent) -> bool {
        let mut pending = VecDeque::from([event]);
        let mut keep_running = true;

        while let Some(event) = pending.pop_front() {
            debug!(?event, state = ?self.core.state(), "supervisor received event");

            let step = self.core.step(event);
            for command in step.commands {
                if let Some(follow_up) = self.execute_command(command).await {
                    pending.push_back(follow_up);
                }
            }
            keep_running &= step.keep_running;
        }

        keep_running
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: SupervisorCommand) -> Option<SupervisorEvent> {
        match command {
            SupervisorCommand::Terminate => {
                self.terminate_child().await;
                None
            }
            SupervisorCommand::Launch => {
                if self.child.is_some() {
                    warn!("launch requested while a child is still live; terminating it first");
                    self.terminate_child().await;
                }
                match self.backend.launch().await {
                    Ok(handle) => {
                        info!(child = ?handle, "supervised program running");
                        self.child = Some(handle);
                        Some(SupervisorEvent::LaunchSucceeded)
                    }
                    Err(e) => {
                        error!(error = %e, "failed to start supervised program; will retry on next change");
                        Some(SupervisorEvent::LaunchFailed)
                    }
                }
            }
            SupervisorCommand::Exit => {
                debug!("core issued Exit command");
                None
            }
        }
    }

    async fn terminate_child(&mut self) {
        let Some(handle) = self.child.take() else {
            debug!("no live child to terminate");
            return;
        };

        info!(child = ?handle, "terminating supervised program");
        if let Err(e) = self.backend.terminate(handle).await {
            warn!(error = %e, "failed to terminate supervised program cleanly");
        }
    }
}

/// Console output for detected modifications: one `Modified: <name>` line per
/// file on stdout.
fn report_modified(result: &ScanResult) {
    for path in &result.modified {
        println!("{}", modified_line(path));
    }
}

fn modified_line(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("Modified: {name}")
}
