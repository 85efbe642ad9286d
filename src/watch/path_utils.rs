// src/watch/path_utils.rs

//! Utility functions for path handling in the catalog, resolver and watcher.

use std::path::{Component, Path, PathBuf};

/// Render a path as a string with forward slashes.
///
/// All containment checks go through this so that `\` separators reported
/// on Windows compare equal to catalog paths.
pub fn normalized_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Drop `.` components so `svc/./src/index` and `svc/src/index` compare equal.
///
/// `..` is kept as-is; resolving it lexically would be wrong across symlinks.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Make `path` absolute by joining it onto `base` when it is relative.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        lexical_clean(path)
    } else {
        lexical_clean(&base.join(path))
    }
}

/// Whether `path` falls under the watched entry `watched`.
///
/// This is a plain string prefix test: a watched handler prefix such as
/// `/svc/src/index` covers `/svc/src/index.ts` as well as `/svc/src/index/`.
pub fn is_covered_by(path: &Path, watched: &Path) -> bool {
    normalized_str(path).starts_with(&normalized_str(watched))
}
