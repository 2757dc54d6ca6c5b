// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Walking the watch root recursively (hidden directories pruned).
//! - Selecting watched files by suffix.
//! - Keeping the per-path modification-time cache ([`WatchState`]).
//!
//! It does **not** know about processes; it only answers "did anything change
//! since the last scan?".

pub mod detector;
pub mod state;

pub use detector::ChangeDetector;
pub use state::{Observation, ScanResult, WatchState};
