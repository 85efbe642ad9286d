// src/resolve.rs

//! Classify a changed path against the catalog.

use std::fmt;
use std::path::Path;

use crate::catalog::Catalog;
use crate::types::FunctionName;
use crate::watch::path_utils::normalized_str;

/// Outcome of resolving one change event. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path belongs to this function's handler module.
    SingleTarget(FunctionName),
    /// The path is the service configuration file.
    ServiceConfig,
    /// Neither; every function in the catalog gets redeployed.
    Unmatched,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::SingleTarget(name) => write!(f, "function {name}"),
            Resolution::ServiceConfig => f.write_str("service config"),
            Resolution::Unmatched => f.write_str("unmatched"),
        }
    }
}

/// Resolve `path` against `catalog`.
///
/// A path matches a target when it contains the target's source path, so
/// `src/index.ts` and `.build/src/index.js` both match `src/index`. Targets
/// are tried in catalog order and the first match wins. Only when no target
/// matches is the config path checked.
pub fn resolve(path: &Path, catalog: &Catalog) -> Resolution {
    let path = normalized_str(path);

    if let Some(target) = catalog
        .targets()
        .iter()
        .find(|t| path.contains(&normalized_str(t.source_path())))
    {
        return Resolution::SingleTarget(target.name().to_string());
    }

    if path.contains(&normalized_str(catalog.config_path())) {
        return Resolution::ServiceConfig;
    }

    Resolution::Unmatched
}
