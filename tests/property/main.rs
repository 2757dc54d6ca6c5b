use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proptest::prelude::*;
use watchsup::fs::mock::MockFileSystem;
use watchsup::watch::ChangeDetector;

const FILES: [&str; 5] = [
    "/proj/main.go",
    "/proj/pkg/a.go",
    "/proj/pkg/deep/b.go",
    "/proj/.hidden/c.go",
    "/proj/notes.txt",
];

fn is_tracked(path: &str) -> bool {
    path.ends_with(".go") && !path.contains("/.")
}

// Each round sets a new timestamp (possibly older, equal or newer) on a
// subset of files, then scans once.
fn rounds_strategy() -> impl Strategy<Value = Vec<Vec<(usize, i64)>>> {
    proptest::collection::vec(
        proptest::collection::vec((0..FILES.len(), 0i64..20), 0..4),
        1..12,
    )
}

proptest! {
    #[test]
    fn change_reported_iff_tracked_timestamp_strictly_increased(
        initial in proptest::collection::vec(0i64..20, FILES.len()),
        rounds in rounds_strategy(),
    ) {
        let fs = MockFileSystem::new();
        for (path, t) in FILES.iter().zip(&initial) {
            fs.add_file(path, *t);
        }

        let mut det = ChangeDetector::new(Arc::new(fs.clone()), ".go");

        // Cold baseline: nothing is a change on first sight.
        prop_assert!(!det.scan(Path::new("/proj")).changed());

        // Reference model: maximum observed timestamp per tracked file.
        let mut model: HashMap<&str, i64> = FILES
            .iter()
            .zip(&initial)
            .filter(|(p, _)| is_tracked(p))
            .map(|(p, t)| (*p, *t))
            .collect();

        for round in rounds {
            let mut current: HashMap<usize, i64> = HashMap::new();
            for (idx, t) in round {
                fs.touch(FILES[idx], t);
                current.insert(idx, t);
            }

            let mut expected: Vec<PathBuf> = Vec::new();
            for (idx, t) in current {
                let path = FILES[idx];
                if let Some(max) = model.get_mut(path) {
                    if t > *max {
                        *max = t;
                        expected.push(PathBuf::from(path));
                    }
                }
            }

            let result = det.scan(Path::new("/proj"));
            let mut got = result.modified.clone();
            got.sort();
            expected.sort();
            prop_assert_eq!(&got, &expected);
            prop_assert_eq!(result.changed(), !expected.is_empty());

            // Stored values are the running maximum.
            for (path, max) in &model {
                prop_assert_eq!(det.state().get(Path::new(path)), Some(*max));
            }
            prop_assert_eq!(det.state().len(), model.len());

            // Idempotence.
            prop_assert!(!det.scan(Path::new("/proj")).changed());
        }
    }
}
