// src/engine/mod.rs

//! Change loop for slswatch.
//!
//! The loop owns no deployment logic. It sequences:
//! - watch events from the filesystem watcher
//! - path resolution against the catalog
//! - dispatch of the resolved deploy strategy
//! - feedback state (clear screen, status line)
//!
//! The pure state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use crate::types::ServiceFailurePolicy;

/// Runtime options used by the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// What to do when a full-service deploy fails.
    pub service_failure: ServiceFailurePolicy,
}

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A watched path changed on disk.
    PathChanged { path: PathBuf },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreLoop, CoreStep, LoopEvent, LoopState};
pub use self::runtime::Runtime;
