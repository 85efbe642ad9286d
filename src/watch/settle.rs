// src/watch/settle.rs

//! Folding the raw notifications of one save into one change.
//!
//! A single save shows up as several notify events: a data modify plus a
//! close-after-write on inotify, or a temp-file write followed by a rename
//! for editors doing atomic saves. [`SaveTracker`] holds each path until it
//! has been quiet for the settle window, then reports it once.
//!
//! Saves further apart than the window stay separate changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a path must be quiet before its save counts as finished.
pub const SAVE_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct PendingSave {
    first_seen: u64,
    last_event: Instant,
}

/// Deterministic per-path settle map. Time is passed in by the caller.
#[derive(Debug)]
pub struct SaveTracker {
    window: Duration,
    pending: HashMap<PathBuf, PendingSave>,
    seq: u64,
}

impl SaveTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
            seq: 0,
        }
    }

    /// Record a raw event for `path` at `now`. Returns false when the path
    /// was already waiting to settle.
    pub fn record(&mut self, path: PathBuf, now: Instant) -> bool {
        match self.pending.get_mut(&path) {
            Some(pending) => {
                pending.last_event = now;
                false
            }
            None => {
                self.seq += 1;
                self.pending.insert(
                    path,
                    PendingSave {
                        first_seen: self.seq,
                        last_event: now,
                    },
                );
                true
            }
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Earliest instant at which some pending path settles.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .values()
            .map(|p| p.last_event + self.window)
            .min()
    }

    /// Remove and return every path quiet for at least the window, in the
    /// order their first event arrived.
    pub fn take_settled(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut ready: Vec<(u64, PathBuf)> = self
            .pending
            .iter()
            .filter(|(_, p)| now.saturating_duration_since(p.last_event) >= self.window)
            .map(|(path, p)| (p.first_seen, path.clone()))
            .collect();
        ready.sort();

        for (_, path) in &ready {
            self.pending.remove(path);
        }
        ready.into_iter().map(|(_, path)| path).collect()
    }
}

/// Editor scratch files: backups (`index.ts~`), swap files, vim's `4913`
/// writability check file, emacs lock files and `*.tmp` staging files for atomic saves.
///
/// These share the handler prefix (`src/index` covers `src/index.ts.tmp`)
/// but are never the saved source.
pub fn is_editor_scratch(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with('~')
        || name.starts_with(".#")
        || name == "4913"
        || [".tmp", ".swp", ".swo", ".swx"]
            .iter()
            .any(|ext| name.ends_with(ext))
}
