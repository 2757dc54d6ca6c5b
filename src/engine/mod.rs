// src/engine/mod.rs

//! Supervision engine for watchsup.
//!
//! This module ties together:
//! - the change detector (what changed since the last tick)
//! - the process backend (how the child is launched and stopped)
//! - the main loop that reacts to:
//!   - polling ticks
//!   - external control events (shutdown, forced restart)
//!
//! The pure state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

/// Lifecycle state of the supervised child, as tracked by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No child is running (initially, or after a failed launch).
    Stopped,
    /// First launch (or relaunch after a failure) in progress.
    Starting,
    /// A child is live.
    Running,
    /// The previous child was told to stop; a replacement is being launched.
    Restarting,
    /// Shutdown requested; the loop is exiting.
    Terminated,
}

/// Events flowing into the supervisor core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// The loop is starting; launch the initial child.
    Startup,
    /// A scan reported at least one modified file (or a restart was forced).
    ChangeDetected,
    /// The backend started a child.
    LaunchSucceeded,
    /// The backend could not start a child (build or spawn failed).
    LaunchFailed,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Loop timing and location.
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    pub root: std::path::PathBuf,
    pub interval: std::time::Duration,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreStep, SupervisorCommand, SupervisorCore};
pub use self::runtime::Supervisor;
