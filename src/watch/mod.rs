// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Planning which directories/files to register with the OS watcher.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Filtering raw notifications down to content changes inside the watch set.
//! - Folding the several raw events of one save into a single change.
//!
//! It does **not** know which function a path belongs to; that is the
//! resolver's job.

pub mod path_utils;
pub mod plan;
pub mod settle;
pub mod watcher;

pub use plan::{absolute_entries, plan_watch_roots, WatchRoot};
pub use settle::{is_editor_scratch, SaveTracker, SAVE_SETTLE};
pub use watcher::{changed_paths, is_content_change, spawn_watcher, WatcherHandle};
