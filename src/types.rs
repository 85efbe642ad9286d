// src/types.rs

/// Canonical function name type used throughout the crate.
pub type FunctionName = String;

/// What the change loop does when a full-service deploy fails.
///
/// - `Propagate`: end the session and surface the error (default).
/// - `KeepWatching`: log the failure and go back to watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceFailurePolicy {
    #[default]
    Propagate,
    KeepWatching,
}
