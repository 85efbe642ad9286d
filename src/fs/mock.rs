// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockEntry {
    File,
    Dir,
}

/// In-memory filesystem for tests.
///
/// Adding a file implicitly creates all of its ancestor directories.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<Vec<(PathBuf, MockEntry)>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.insert(path, MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut seen = HashSet::new();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() || !seen.insert(ancestor.to_path_buf()) {
                continue;
            }
            self.insert(ancestor, MockEntry::Dir);
        }
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries.iter_mut().find(|(p, _)| p == path) {
            existing.1 = entry;
        } else {
            entries.push((path.to_path_buf(), entry));
        }
    }

    fn lookup(&self, path: &Path) -> Option<MockEntry> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, entry)| *entry)
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lookup(path) == Some(MockEntry::File)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lookup(path) == Some(MockEntry::Dir)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // Tests use absolute paths, so there is nothing to resolve.
        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(anyhow!("File not found: {:?}", path))
        }
    }
}
