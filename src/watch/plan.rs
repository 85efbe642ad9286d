// src/watch/plan.rs

//! Turning a watch set into concrete OS watch registrations.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::catalog::WatchSet;
use crate::fs::FileSystem;
use crate::watch::path_utils::absolutize;

/// One path handed to the OS watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

/// Absolute form of every watch-set entry, used to filter raw events.
pub fn absolute_entries(service_dir: &Path, watch_set: &WatchSet) -> Vec<PathBuf> {
    watch_set
        .paths()
        .map(|p| absolutize(service_dir, p))
        .collect()
}

/// Decide what to register with the OS watcher.
///
/// - existing directory: watched recursively
/// - existing file: watched on its own
/// - missing path (typically a handler prefix like `<dir>/src/index`): its
///   nearest existing ancestor directory, non-recursively
///
/// Roots are returned in watch-set order with duplicates collapsed; when a
/// path is wanted both ways the recursive registration wins.
pub fn plan_watch_roots(
    fs: &dyn FileSystem,
    service_dir: &Path,
    watch_set: &WatchSet,
) -> Vec<WatchRoot> {
    let mut roots: Vec<WatchRoot> = Vec::new();

    for path in absolute_entries(service_dir, watch_set) {
        let root = if fs.is_dir(&path) {
            WatchRoot {
                path,
                recursive: true,
            }
        } else if fs.exists(&path) {
            WatchRoot {
                path,
                recursive: false,
            }
        } else {
            match path.ancestors().skip(1).find(|a| fs.is_dir(a)) {
                Some(parent) => WatchRoot {
                    path: parent.to_path_buf(),
                    recursive: false,
                },
                None => {
                    warn!(?path, "no existing directory to watch for path; skipping");
                    continue;
                }
            }
        };

        match roots.iter_mut().find(|r| r.path == root.path) {
            Some(existing) => existing.recursive |= root.recursive,
            None => roots.push(root),
        }
    }

    roots
}
