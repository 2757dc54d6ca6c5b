// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually building and running the
//! supervised program using `tokio::process::Command`.
//!
//! - [`process`] runs the build step, spawns the child and stops it.
//! - [`backend`] provides the `ProcessBackend` trait and a concrete
//!   `CommandBackend` that the supervisor uses in production, and which tests
//!   can replace with a fake implementation.

pub mod backend;
pub mod process;

pub use backend::{CommandBackend, ProcessBackend};
pub use process::RunningChild;
