// src/engine/core.rs

//! Pure supervisor state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`SupervisorEvent`]s and produces:
//! - an updated [`SupervisorState`]
//! - a list of commands describing what the IO shell should do next
//!
//! The ordering guarantee lives here: whenever a live child is replaced, the
//! `Terminate` command is emitted before the `Launch` command, and the shell
//! executes commands strictly in order.

use crate::engine::{SupervisorEvent, SupervisorState};

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorCommand {
    /// Stop the current child (if any) and wait for it to exit.
    Terminate,
    /// Start a new child.
    Launch,
    /// Leave the main loop.
    Exit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<SupervisorCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn run(commands: Vec<SupervisorCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn idle() -> Self {
        Self::run(Vec::new())
    }
}

#[derive(Debug)]
pub struct SupervisorCore {
    state: SupervisorState,
    restarts: u64,
}

impl Default for SupervisorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisorCore {
    pub fn new() -> Self {
        Self {
            state: SupervisorState::Stopped,
            restarts: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Number of change-triggered relaunches issued so far.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Handle a single event, updating state and returning the commands for
    /// the IO shell.
    pub fn step(&mut self, event: SupervisorEvent) -> CoreStep {
        use SupervisorCommand::*;
        use SupervisorEvent::*;
        use SupervisorState::*;

        match (self.state, event) {
            (Terminated, _) => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },

            (_, ShutdownRequested) => {
                let mut commands = Vec::new();
                if self.state == Running {
                    commands.push(Terminate);
                }
                commands.push(Exit);
                self.state = Terminated;
                CoreStep {
                    commands,
                    keep_running: false,
                }
            }

            (Stopped, Startup) => {
                self.state = Starting;
                CoreStep::run(vec![Launch])
            }

            (Running, ChangeDetected) => {
                self.state = Restarting;
                self.restarts += 1;
                CoreStep::run(vec![Terminate, Launch])
            }

            // Previous launch failed: the next change is the retry.
            (Stopped, ChangeDetected) => {
                self.state = Starting;
                self.restarts += 1;
                CoreStep::run(vec![Launch])
            }

            (Starting | Restarting, LaunchSucceeded) => {
                self.state = Running;
                CoreStep::idle()
            }

            (Starting | Restarting, LaunchFailed) => {
                self.state = Stopped;
                CoreStep::idle()
            }

            // Anything else (duplicate startup, change while a launch is in
            // flight, stray launch results) is ignored.
            _ => CoreStep::idle(),
        }
    }
}
