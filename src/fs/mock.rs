// src/fs/mock.rs

use super::{DirEntryInfo, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: i64 },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem with settable modification times.
///
/// Clones share the same underlying tree, so a test can keep one handle and
/// mutate timestamps while the detector under test holds another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    unreadable: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            unreadable: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Add a file (or overwrite its timestamp), creating parents implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, modified: i64) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.files.lock().unwrap();
        files.insert(path.clone(), MockEntry::File { modified });
        Self::link_to_parent(&mut files, &path);
    }

    /// Set the timestamp of a file. Same as [`MockFileSystem::add_file`].
    pub fn touch(&self, path: impl AsRef<Path>, modified: i64) {
        self.add_file(path, modified);
    }

    /// Add an (empty) directory, creating parents implicitly.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Make `read_dir` fail for this directory.
    pub fn make_unreadable(&self, path: impl AsRef<Path>) {
        self.unreadable
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf());
    }

    fn link_to_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if parent == path {
            return;
        }

        Self::ensure_dir_entry(files, parent);
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if !files.contains_key(path) {
            files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
            Self::link_to_parent(files, path);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // In mock, we just return the path as is, assuming absolute paths are used in tests
        Ok(path.to_path_buf())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        if self.unreadable.lock().unwrap().contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .filter_map(|name| {
                    let entry = match files.get(&path.join(name))? {
                        MockEntry::File { modified } => DirEntryInfo {
                            name: name.clone(),
                            is_dir: false,
                            modified: *modified,
                        },
                        MockEntry::Dir(_) => DirEntryInfo {
                            name: name.clone(),
                            is_dir: true,
                            modified: 0,
                        },
                    };
                    Some(entry)
                })
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
