// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::FunctionName;

/// Conventional configuration filename used when discovery finds nothing.
pub const DEFAULT_CONFIGURATION_FILENAME: &str = "serverless.yml";

/// Service metadata as printed by the host platform.
///
/// This is a direct mapping of the resolved configuration, e.g. the output
/// of `serverless print --format json`:
///
/// ```json
/// {
///   "service": "sls-auto-deploy",
///   "functions": { "hello": { "handler": "src/index.handler" } },
///   "custom": { "serverlessWatch": { "includes": ["src"] } }
/// }
/// ```
///
/// Everything the watcher doesn't need is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServiceMetadata {
    #[serde(default)]
    pub service: Option<String>,

    /// All functions keyed by function name.
    #[serde(default)]
    pub functions: BTreeMap<FunctionName, FunctionConfig>,

    #[serde(default)]
    pub custom: CustomSection,
}

/// One entry under `functions`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FunctionConfig {
    /// Handler reference, `<path-without-extension>.<entry-symbol>`.
    #[serde(default)]
    pub handler: Option<String>,
}

/// `custom` section; only the watcher's own key is read.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomSection {
    #[serde(default, rename = "serverlessWatch")]
    pub serverless_watch: Option<WatchSettings>,
}

/// `custom.serverlessWatch`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WatchSettings {
    /// Extra paths to watch, appended verbatim after the function paths.
    #[serde(default)]
    pub includes: Vec<String>,
}

/// Validated, read-only snapshot of the service handed to the catalog.
///
/// Construct via [`ServiceMetadata::from_raw`]; the snapshot owns copies of
/// every list it keeps.
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    service: Option<String>,
    service_dir: PathBuf,
    configuration_filename: String,
    handlers: BTreeMap<FunctionName, String>,
    watch_includes: Vec<String>,
}

impl ServiceMetadata {
    pub(crate) fn new_unchecked(
        service: Option<String>,
        service_dir: PathBuf,
        configuration_filename: String,
        handlers: BTreeMap<FunctionName, String>,
        watch_includes: Vec<String>,
    ) -> Self {
        Self {
            service,
            service_dir,
            configuration_filename,
            handlers,
            watch_includes,
        }
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    pub fn configuration_filename(&self) -> &str {
        &self.configuration_filename
    }

    /// Function name -> handler reference, in name order.
    pub fn handlers(&self) -> &BTreeMap<FunctionName, String> {
        &self.handlers
    }

    pub fn watch_includes(&self) -> &[String] {
        &self.watch_includes
    }
}
