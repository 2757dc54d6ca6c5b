// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The supervisor talks to a `ProcessBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests while keeping
//! the production implementation in [`process`](super::process).
//!
//! - `CommandBackend` is the default implementation used by `watchsup`.
//! - Tests can provide their own `ProcessBackend` that, for example, records
//!   start/stop ordering without touching the OS.

use std::fmt::Debug;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::config::ProgramConfig;
use crate::errors::Result;

use super::process::{RunningChild, launch_program, stop_child};

/// Trait abstracting how the supervised program is started and stopped.
pub trait ProcessBackend: Send {
    /// Handle to one running instance of the program.
    type Handle: Debug + Send;

    /// Start a new instance (running the build step first if configured).
    fn launch(&mut self) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>>;

    /// Stop the given instance and wait until it has exited.
    ///
    /// An instance that already exited must be treated as success.
    fn terminate(
        &mut self,
        handle: Self::Handle,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real backend: builds and runs the program with `tokio::process`.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: ProgramConfig,
    root: PathBuf,
}

impl CommandBackend {
    /// `root` is used as the working directory for the build step and the
    /// child, and as the base for a relative executable path.
    pub fn new(program: ProgramConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            program,
            root: root.into(),
        }
    }
}

impl ProcessBackend for CommandBackend {
    type Handle = RunningChild;

    fn launch(&mut self) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>> {
        Box::pin(launch_program(&self.program, &self.root))
    }

    fn terminate(
        &mut self,
        handle: Self::Handle,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let grace = self.program.grace_period;
        Box::pin(stop_child(handle, grace))
    }
}
