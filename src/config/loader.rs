// src/config/loader.rs

use std::fs;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::model::{RawServiceMetadata, DEFAULT_CONFIGURATION_FILENAME};
use crate::dispatch::ForwardedOptions;
use crate::errors::{Result, SlswatchError};
use crate::fs::FileSystem;

/// Configuration filenames the host platform looks for, in lookup order.
pub const CONFIGURATION_FILENAMES: &[&str] = &[
    "serverless.yml",
    "serverless.yaml",
    "serverless.json",
    "serverless.js",
    "serverless.ts",
    "serverless.mjs",
    "serverless.cjs",
];

/// Parse a metadata snapshot.
///
/// `.toml` files are read as TOML; everything else is treated as the JSON
/// emitted by the host's `print --format json`.
pub fn parse_metadata(contents: &str, path_hint: Option<&Path>) -> Result<RawServiceMetadata> {
    let is_toml = path_hint
        .and_then(|p| p.extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let raw = if is_toml {
        toml::from_str(contents)?
    } else {
        serde_json::from_str(contents)?
    };
    Ok(raw)
}

/// Load a metadata snapshot from a file.
///
/// This only performs deserialization; validation happens in
/// [`crate::config::ServiceMetadata::from_raw`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawServiceMetadata> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!(?path, bytes = contents.len(), "read metadata snapshot");
    parse_metadata(&contents, Some(path))
}

/// Ask the host platform for the resolved service configuration.
///
/// Runs `<deploy_bin> print --format json` in `service_dir`, forwarding
/// `--stage` and `--config` so the host resolves the same service the
/// deploys will target.
pub async fn load_from_host(
    deploy_bin: &str,
    service_dir: &Path,
    forwarded: &ForwardedOptions,
) -> Result<RawServiceMetadata> {
    let mut args = vec![
        "print".to_string(),
        "--format".to_string(),
        "json".to_string(),
    ];
    if let Some(stage) = &forwarded.stage {
        args.push("--stage".to_string());
        args.push(stage.clone());
    }
    if let Some(config) = &forwarded.config {
        args.push("--config".to_string());
        args.push(config.clone());
    }

    info!(bin = %deploy_bin, ?args, "loading service metadata from host");

    let output = Command::new(deploy_bin)
        .args(&args)
        .current_dir(service_dir)
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SlswatchError::ConfigError(format!(
            "`{} print` exited with {}: {}",
            deploy_bin,
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_metadata(extract_json(&stdout), None)
}

/// The host may print banners or warnings before the JSON document; start
/// parsing at the first `{`.
fn extract_json(stdout: &str) -> &str {
    match stdout.find('{') {
        Some(idx) => &stdout[idx..],
        None => stdout,
    }
}

/// Pick the configuration filename the host would use for `service_dir`.
pub fn discover_configuration_filename(fs: &dyn FileSystem, service_dir: &Path) -> String {
    CONFIGURATION_FILENAMES
        .iter()
        .find(|name| fs.is_file(&service_dir.join(name)))
        .map(|name| name.to_string())
        .unwrap_or_else(|| DEFAULT_CONFIGURATION_FILENAME.to_string())
}
