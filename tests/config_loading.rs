// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use slswatch::catalog::build_catalog;
use slswatch::config::{load_from_path, ServiceMetadata};
use slswatch::errors::SlswatchError;

type TestResult = Result<(), Box<dyn Error>>;

const PRINT_OUTPUT: &str = r#"{
  "service": "sls-auto-deploy",
  "frameworkVersion": "3",
  "provider": { "name": "aws", "runtime": "nodejs16.x", "stage": "dev" },
  "functions": {
    "hello": {
      "handler": "src/index.handler",
      "events": [{ "httpApi": { "path": "/soma", "method": "get" } }]
    }
  },
  "custom": {
    "esbuild": { "bundle": true },
    "serverlessWatch": { "includes": ["src"] }
  }
}"#;

#[test]
fn loads_json_snapshot_and_builds_catalog() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "{}", PRINT_OUTPUT)?;

    let raw = load_from_path(file.path())?;
    let meta = ServiceMetadata::from_raw(raw, "/work/example", "serverless.ts")?;
    assert_eq!(meta.service(), Some("sls-auto-deploy"));

    let catalog = build_catalog(&meta, None, None)?;
    let paths: Vec<&Path> = catalog.watch_set().paths().collect();
    assert_eq!(
        paths,
        vec![
            Path::new("/work/example/src/index"),
            Path::new("/work/example/serverless.ts"),
            Path::new("src"),
        ]
    );
    Ok(())
}

#[test]
fn loads_toml_snapshot_by_extension() -> TestResult {
    let mut file = Builder::new().suffix(".toml").tempfile()?;
    write!(
        file,
        r#"
service = "svc"

[functions.hello]
handler = "src/index.handler"

[functions.users]
handler = "src/users.list"
"#
    )?;

    let raw = load_from_path(file.path())?;
    let meta = ServiceMetadata::from_raw(raw, "/svc", "serverless.yml")?;
    assert_eq!(meta.handlers().len(), 2);
    assert!(meta.watch_includes().is_empty());
    Ok(())
}

#[test]
fn malformed_json_is_a_structured_error() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "{{ \"functions\": ")?;

    match load_from_path(file.path()) {
        Err(SlswatchError::JsonError(_)) => Ok(()),
        other => panic!("Expected JsonError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn missing_snapshot_is_an_io_error() {
    let result = load_from_path("/definitely/not/here/metadata.json");
    assert!(matches!(result, Err(SlswatchError::IoError(_))));
}

#[test]
fn service_without_functions_is_rejected() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, r#"{{ "service": "empty" }}"#)?;

    let raw = load_from_path(file.path())?;
    match ServiceMetadata::from_raw(raw, "/svc", "serverless.yml") {
        Err(err @ SlswatchError::ConfigError(_)) => {
            assert!(err.is_configuration_error());
            Ok(())
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}
