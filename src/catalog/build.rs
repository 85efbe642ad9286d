// src/catalog/build.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalog::{Catalog, DeploymentTarget, WatchEntry, WatchEntryKind, WatchSet};
use crate::config::ServiceMetadata;
use crate::errors::{Result, SlswatchError};
use crate::watch::path_utils::{absolutize, lexical_clean, normalized_str};

/// Strip the entry-symbol suffix from a handler reference.
///
/// `src/index.handler` -> `src/index`. Only the last path segment is
/// considered, so dots in directory names survive
/// (`src/v1.2/index.handler` -> `src/v1.2/index`). A leading dot in the
/// last segment is part of the file name, not a separator.
pub fn strip_handler_suffix(handler: &str) -> &str {
    let segment_start = handler.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    match handler[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &handler[..segment_start + dot],
        _ => handler,
    }
}

/// Source path prefix for a handler, rooted at the service directory.
pub fn source_path_for(service_dir: &Path, handler: &str) -> PathBuf {
    lexical_clean(&service_dir.join(strip_handler_suffix(handler)))
}

/// Build the catalog and watch set for a session.
///
/// - `scope` restricts the catalog to a single function; an unknown name is
///   a configuration error and nothing is returned.
/// - `config_override` replaces the default `<service_dir>/<config file>`
///   entry; it is never added alongside it.
pub fn build_catalog(
    meta: &ServiceMetadata,
    scope: Option<&str>,
    config_override: Option<&Path>,
) -> Result<Catalog> {
    let service_dir = meta.service_dir().to_path_buf();

    let selected: Vec<(&String, &String)> = match scope {
        Some(name) => {
            let (key, handler) = meta
                .handlers()
                .get_key_value(name)
                .ok_or_else(|| SlswatchError::FunctionNotFound(name.to_string()))?;
            vec![(key, handler)]
        }
        None => meta.handlers().iter().collect(),
    };

    let mut targets = Vec::with_capacity(selected.len());
    let mut seen: HashMap<PathBuf, &str> = HashMap::new();
    for (name, handler) in selected {
        let source_path = source_path_for(&service_dir, handler);
        if let Some(first) = seen.insert(source_path.clone(), name.as_str()) {
            return Err(SlswatchError::DuplicateSourcePath {
                path: source_path,
                first: first.to_string(),
                second: name.clone(),
            });
        }
        targets.push(DeploymentTarget::new(name.clone(), source_path));
    }
    warn_on_overlapping_prefixes(&targets);

    let config_path = match config_override {
        Some(path) => absolutize(&service_dir, path),
        None => lexical_clean(&service_dir.join(meta.configuration_filename())),
    };

    let mut entries: Vec<WatchEntry> = targets
        .iter()
        .map(|t| WatchEntry {
            path: t.source_path().to_path_buf(),
            kind: WatchEntryKind::Function(t.name().to_string()),
        })
        .collect();
    entries.push(WatchEntry {
        path: config_path.clone(),
        kind: WatchEntryKind::ServiceConfig,
    });
    entries.extend(meta.watch_includes().iter().map(|extra| WatchEntry {
        path: PathBuf::from(extra),
        kind: WatchEntryKind::Extra,
    }));

    debug!(
        functions = targets.len(),
        watch_paths = entries.len(),
        config = ?config_path,
        "built deployment catalog"
    );

    Ok(Catalog::new(
        service_dir,
        targets,
        config_path,
        WatchSet::new(entries),
    ))
}

/// Two source paths where one contains the other make resolution depend on
/// catalog order. That is left as-is, but worth a warning at startup.
fn warn_on_overlapping_prefixes(targets: &[DeploymentTarget]) {
    for (i, a) in targets.iter().enumerate() {
        for b in targets.iter().skip(i + 1) {
            let (sa, sb) = (normalized_str(a.source_path()), normalized_str(b.source_path()));
            if sa.contains(&sb) || sb.contains(&sa) {
                warn!(
                    first = %a.name(),
                    second = %b.name(),
                    "function source paths overlap; the first in catalog order wins"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_last_segment_suffix() {
        assert_eq!(strip_handler_suffix("src/index.handler"), "src/index");
        assert_eq!(strip_handler_suffix("src/my.module.handler"), "src/my.module");
        assert_eq!(strip_handler_suffix("src/v1.2/index.handler"), "src/v1.2/index");
        assert_eq!(strip_handler_suffix("handler"), "handler");
        assert_eq!(strip_handler_suffix("src/v1.2/index"), "src/v1.2/index");
        assert_eq!(strip_handler_suffix("src/.hidden"), "src/.hidden");
    }

    #[test]
    fn source_path_is_rooted_and_cleaned() {
        assert_eq!(
            source_path_for(Path::new("/svc"), "./src/index.handler"),
            PathBuf::from("/svc/src/index")
        );
        assert_eq!(
            source_path_for(Path::new("."), "src/index.handler"),
            PathBuf::from("src/index")
        );
    }
}
