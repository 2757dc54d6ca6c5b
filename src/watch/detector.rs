// src/watch/detector.rs

//! Recursive, polling change detection over one directory tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::watch::state::{Observation, ScanResult, WatchState};

/// Walks a directory tree and reports files whose modification time has
/// advanced since they were last observed.
///
/// Only regular entries whose name ends with `suffix` are tracked.
/// Directories whose name starts with `.` are not descended into.
#[derive(Debug)]
pub struct ChangeDetector {
    fs: Arc<dyn FileSystem>,
    suffix: String,
    state: WatchState,
}

impl ChangeDetector {
    pub fn new(fs: Arc<dyn FileSystem>, suffix: impl Into<String>) -> Self {
        Self {
            fs,
            suffix: suffix.into(),
            state: WatchState::new(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Scan `root` recursively, updating the timestamp cache.
    ///
    /// Unreadable directories are logged and skipped; a scan never fails.
    pub fn scan(&mut self, root: &Path) -> ScanResult {
        let root = match self.fs.canonicalize(root) {
            Ok(p) => p,
            Err(e) => {
                warn!(root = ?root, error = %e, "cannot resolve watch root; skipping scan");
                return ScanResult::default();
            }
        };

        let mut result = ScanResult::default();
        self.scan_dir(&root, &mut result);
        result
    }

    fn scan_dir(&mut self, dir: &Path, result: &mut ScanResult) {
        let entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = ?dir, error = %e, "cannot read directory; skipping subtree");
                return;
            }
        };

        for entry in entries {
            if entry.is_dir {
                if entry.name.starts_with('.') {
                    debug!(dir = ?dir, entry = %entry.name, "skipping hidden directory");
                    continue;
                }
                self.scan_dir(&dir.join(&entry.name), result);
                continue;
            }

            if !self.is_watched(&entry.name) {
                continue;
            }

            let key: PathBuf = dir.join(&entry.name);
            match self.state.observe(key.clone(), entry.modified) {
                Observation::Baseline => {
                    debug!(path = ?key, modified = entry.modified, "recorded baseline");
                }
                Observation::Modified => {
                    debug!(path = ?key, modified = entry.modified, "file modified");
                    result.modified.push(key);
                }
                Observation::Unchanged => {}
            }
        }
    }

    fn is_watched(&self, name: &str) -> bool {
        name.ends_with(&self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn detector(fs: &MockFileSystem) -> ChangeDetector {
        ChangeDetector::new(Arc::new(fs.clone()), ".go")
    }

    #[test]
    fn first_scan_only_records_baseline() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.go", 100);
        fs.add_file("/proj/pkg/b.go", 100);

        let mut det = detector(&fs);
        let result = det.scan(Path::new("/proj"));

        assert!(!result.changed());
        assert_eq!(det.state().len(), 2);
    }

    #[test]
    fn a_go_b_txt_scenario() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.go", 100);
        fs.add_file("/proj/b.txt", 100);
        let mut det = detector(&fs);

        assert!(!det.scan(Path::new("/proj")).changed());
        assert_eq!(det.state().len(), 1);
        assert_eq!(det.state().get(Path::new("/proj/a.go")), Some(100));

        fs.touch("/proj/a.go", 200);
        let second = det.scan(Path::new("/proj"));
        assert!(second.changed());
        assert_eq!(second.modified, vec![PathBuf::from("/proj/a.go")]);
        assert_eq!(det.state().len(), 1);
        assert_eq!(det.state().get(Path::new("/proj/a.go")), Some(200));

        assert!(!det.scan(Path::new("/proj")).changed());
    }

    #[test]
    fn repeated_scan_without_changes_is_idle() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.go", 5);
        let mut det = detector(&fs);

        det.scan(Path::new("/proj"));
        fs.touch("/proj/a.go", 6);
        assert!(det.scan(Path::new("/proj")).changed());
        assert!(!det.scan(Path::new("/proj")).changed());
    }

    #[test]
    fn older_timestamp_is_not_a_change() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.go", 100);
        let mut det = detector(&fs);
        det.scan(Path::new("/proj"));

        fs.touch("/proj/a.go", 90);
        assert!(!det.scan(Path::new("/proj")).changed());
        assert_eq!(det.state().get(Path::new("/proj/a.go")), Some(100));
    }

    #[test]
    fn deeply_nested_file_is_detected() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a/b/c/d/e/deep.go", 1);
        let mut det = detector(&fs);
        det.scan(Path::new("/proj"));

        fs.touch("/proj/a/b/c/d/e/deep.go", 2);
        let result = det.scan(Path::new("/proj"));
        assert_eq!(result.modified, vec![PathBuf::from("/proj/a/b/c/d/e/deep.go")]);
    }

    #[test]
    fn hidden_directories_are_never_scanned() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/.git/hooks/x.go", 1);
        fs.add_file("/proj/src/.cache/y.go", 1);
        let mut det = detector(&fs);

        det.scan(Path::new("/proj"));
        assert!(det.state().is_empty());

        fs.touch("/proj/.git/hooks/x.go", 2);
        fs.touch("/proj/src/.cache/y.go", 2);
        assert!(!det.scan(Path::new("/proj")).changed());
        assert!(det.state().is_empty());
    }

    #[test]
    fn hidden_files_still_match_suffix() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/.gen.go", 1);
        let mut det = detector(&fs);
        det.scan(Path::new("/proj"));
        assert_eq!(det.state().get(Path::new("/proj/.gen.go")), Some(1));
    }

    #[test]
    fn unreadable_subtree_is_skipped_without_aborting_scan() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/locked/x.go", 1);
        fs.add_file("/proj/open/y.go", 1);
        fs.make_unreadable("/proj/locked");
        let mut det = detector(&fs);

        det.scan(Path::new("/proj"));
        fs.touch("/proj/open/y.go", 2);
        let result = det.scan(Path::new("/proj"));

        assert_eq!(result.modified, vec![PathBuf::from("/proj/open/y.go")]);
        assert_eq!(det.state().get(Path::new("/proj/locked/x.go")), None);
    }

    #[test]
    fn custom_suffix_is_respected() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/main.rs", 1);
        fs.add_file("/proj/main.go", 1);
        let mut det = ChangeDetector::new(Arc::new(fs.clone()), ".rs");

        det.scan(Path::new("/proj"));
        assert_eq!(det.state().len(), 1);
        assert!(det.state().get(Path::new("/proj/main.rs")).is_some());
    }

    #[test]
    fn files_added_later_start_as_baseline() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.go", 1);
        let mut det = detector(&fs);
        det.scan(Path::new("/proj"));

        fs.add_file("/proj/new.go", 50);
        assert!(!det.scan(Path::new("/proj")).changed());
        assert_eq!(det.state().len(), 2);
    }
}
