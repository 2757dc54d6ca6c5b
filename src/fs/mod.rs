// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::debug;

pub mod mock;

/// A single directory entry as seen by the change detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name of the entry (last path component).
    pub name: String,
    /// True for real directories. Symlinks are never reported as directories.
    pub is_dir: bool,
    /// Modification time in whole seconds since the Unix epoch.
    pub modified: i64,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Return all entries of a directory in a single read.
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry.with_context(|| format!("reading entry of {:?}", path))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            // `DirEntry::metadata` does not follow symlinks.
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    debug!(dir = ?path, entry = %name, error = %e, "skipping entry without metadata");
                    continue;
                }
            };
            let modified = match metadata.modified() {
                Ok(t) => unix_seconds(t),
                Err(e) => {
                    debug!(dir = ?path, entry = %name, error = %e, "skipping entry without mtime");
                    continue;
                }
            };

            entries.push(DirEntryInfo {
                name,
                is_dir: metadata.is_dir(),
                modified,
            });
        }
        Ok(entries)
    }
}

fn unix_seconds(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
