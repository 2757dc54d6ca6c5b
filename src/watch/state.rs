// src/watch/state.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of comparing a freshly observed timestamp against the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First sighting of this path; timestamp recorded as the baseline.
    Baseline,
    /// Timestamp strictly advanced; cache updated.
    Modified,
    /// Timestamp equal to or older than the cached one; cache untouched.
    Unchanged,
}

/// Last observed modification time (seconds since epoch) per absolute path.
///
/// Stored values only ever grow: a path's entry is always the maximum
/// timestamp seen for it so far.
#[derive(Debug, Default, Clone)]
pub struct WatchState {
    times: HashMap<PathBuf, i64>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<i64> {
        self.times.get(path).copied()
    }

    /// Record an observation of `path` with modification time `modified`.
    pub fn observe(&mut self, path: PathBuf, modified: i64) -> Observation {
        match self.times.get_mut(&path) {
            None => {
                self.times.insert(path, modified);
                Observation::Baseline
            }
            Some(prev) if modified > *prev => {
                *prev = modified;
                Observation::Modified
            }
            Some(_) => Observation::Unchanged,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, i64)> {
        self.times.iter().map(|(p, t)| (p.as_path(), *t))
    }
}

/// Result of a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Paths whose timestamp advanced during this scan, in traversal order.
    pub modified: Vec<PathBuf>,
}

impl ScanResult {
    pub fn changed(&self) -> bool {
        !self.modified.is_empty()
    }
}
