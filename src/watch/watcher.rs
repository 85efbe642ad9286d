// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::path_utils::is_covered_by;
use crate::watch::plan::{absolute_entries, plan_watch_roots};
use crate::watch::settle::{is_editor_scratch, SaveTracker, SAVE_SETTLE};

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Whether a notify event can be part of a save.
///
/// Close-after-write (inotify), data modifies, creations and the
/// destination side of a rename count; atomic saves end with a rename onto
/// the real file. Metadata-only changes, rename sources, plain access and
/// removals don't.
pub fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => false,
        EventKind::Modify(_) | EventKind::Create(_) => true,
        _ => false,
    }
}

/// Paths from `event` that may have been saved: covered by the watch set
/// and not an editor scratch file.
pub fn changed_paths(event: Event, watched: &[PathBuf]) -> Vec<PathBuf> {
    if !is_content_change(&event.kind) {
        return Vec::new();
    }
    event
        .paths
        .into_iter()
        .filter(|p| !is_editor_scratch(p))
        .filter(|p| watched.iter().any(|w| is_covered_by(p, w)))
        .collect()
}

/// Spawn a filesystem watcher for the catalog's watch set and forward one
/// `RuntimeEvent::PathChanged` per save.
///
/// Raw events for a path are held until it has been quiet for
/// [`SAVE_SETTLE`]; a path that is no longer a file by then (a renamed-away
/// temp file, a deleted file) is dropped. Settled paths are forwarded in
/// the order their first event arrived.
pub fn spawn_watcher(
    catalog: &Catalog,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let service_dir = catalog.service_dir();
    let roots = plan_watch_roots(fs.as_ref(), service_dir, catalog.watch_set());
    let watched = absolute_entries(service_dir, catalog.watch_set());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // Not inside the runtime here, so fall back to stderr.
                    eprintln!("slswatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("slswatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    for root in &roots {
        let mode = if root.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&root.path, mode)?;
        debug!(path = ?root.path, recursive = root.recursive, "watching");
    }

    info!(roots = roots.len(), entries = watched.len(), "file watcher started");

    tokio::spawn(async move {
        let mut saves = SaveTracker::new(SAVE_SETTLE);

        loop {
            let deadline = saves
                .next_deadline()
                .map(Instant::from_std)
                .unwrap_or_else(Instant::now);

            tokio::select! {
                received = event_rx.recv() => match received {
                    Some(event) => {
                        debug!(?event, "received notify event");
                        for path in changed_paths(event, &watched) {
                            saves.record(path, Instant::now().into_std());
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline), if saves.pending_len() > 0 => {}
            }

            for path in saves.take_settled(Instant::now().into_std()) {
                if !fs.is_file(&path) {
                    debug!(?path, "settled path is gone; ignoring");
                    continue;
                }
                if let Err(err) = runtime_tx.send(RuntimeEvent::PathChanged { path }).await {
                    warn!("failed to send RuntimeEvent::PathChanged: {err}");
                    // Runtime is gone; nothing left to forward to.
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
