// src/catalog/mod.rs

//! Deployment targets and the watch set derived from service metadata.
//!
//! The catalog is built once per watch session ([`build_catalog`]) and is
//! immutable afterwards. A change to the service configuration file is a
//! service-level event, never a catalog mutation.

pub mod build;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::FunctionName;

pub use build::{build_catalog, source_path_for, strip_handler_suffix};

/// One independently deployable function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    name: FunctionName,
    source_path: PathBuf,
}

impl DeploymentTarget {
    pub fn new(name: impl Into<FunctionName>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path prefix of the handler module, without extension.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// Why a path is in the watch set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEntryKind {
    Function(FunctionName),
    ServiceConfig,
    Extra,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub path: PathBuf,
    pub kind: WatchEntryKind,
}

/// Ordered set of paths to watch: function paths, then the config path,
/// then the `serverlessWatch.includes` extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSet {
    entries: Vec<WatchEntry>,
}

impl WatchSet {
    pub(crate) fn new(entries: Vec<WatchEntry>) -> Self {
        debug_assert!(
            entries
                .iter()
                .any(|e| e.kind == WatchEntryKind::ServiceConfig),
            "watch set must contain the service config path"
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A built catalog never produces an empty set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The resolved set of targets plus everything that should trigger a deploy.
#[derive(Debug, Clone)]
pub struct Catalog {
    service_dir: PathBuf,
    targets: Vec<DeploymentTarget>,
    config_path: PathBuf,
    watch_set: WatchSet,
}

impl Catalog {
    pub(crate) fn new(
        service_dir: PathBuf,
        targets: Vec<DeploymentTarget>,
        config_path: PathBuf,
        watch_set: WatchSet,
    ) -> Self {
        Self {
            service_dir,
            targets,
            config_path,
            watch_set,
        }
    }

    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    /// Targets in catalog iteration order.
    pub fn targets(&self) -> &[DeploymentTarget] {
        &self.targets
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name())
    }

    /// Service configuration path (the override, when one was supplied).
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "service dir: {}", self.service_dir.display())?;
        writeln!(f, "functions:")?;
        for target in &self.targets {
            writeln!(
                f,
                "  - {} -> {}",
                target.name(),
                target.source_path().display()
            )?;
        }
        writeln!(f, "config: {}", self.config_path.display())?;
        writeln!(f, "watching:")?;
        for entry in self.watch_set.entries() {
            let kind = match &entry.kind {
                WatchEntryKind::Function(name) => format!("function {name}"),
                WatchEntryKind::ServiceConfig => "service config".to_string(),
                WatchEntryKind::Extra => "extra".to_string(),
            };
            writeln!(f, "  - {} ({})", entry.path.display(), kind)?;
        }
        Ok(())
    }
}
