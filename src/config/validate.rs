// src/config/validate.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::model::{RawServiceMetadata, ServiceMetadata};
use crate::errors::{Result, SlswatchError};
use crate::types::FunctionName;

impl ServiceMetadata {
    /// Validate a raw snapshot and pin it to a service directory and
    /// configuration filename.
    pub fn from_raw(
        raw: RawServiceMetadata,
        service_dir: impl Into<PathBuf>,
        configuration_filename: impl Into<String>,
    ) -> Result<Self> {
        let handlers = validate_functions(&raw)?;
        let configuration_filename = configuration_filename.into();
        if configuration_filename.trim().is_empty() {
            return Err(SlswatchError::ConfigError(
                "configuration filename must not be empty".to_string(),
            ));
        }

        let watch_includes = raw
            .custom
            .serverless_watch
            .map(|w| w.includes)
            .unwrap_or_default();
        validate_watch_includes(&watch_includes)?;

        Ok(ServiceMetadata::new_unchecked(
            raw.service,
            service_dir.into(),
            configuration_filename,
            handlers,
            watch_includes,
        ))
    }
}

fn validate_functions(raw: &RawServiceMetadata) -> Result<BTreeMap<FunctionName, String>> {
    if raw.functions.is_empty() {
        return Err(SlswatchError::ConfigError(
            "service must declare at least one function".to_string(),
        ));
    }

    let mut handlers = BTreeMap::new();
    for (name, function) in raw.functions.iter() {
        let handler = match function.handler.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => {
                return Err(SlswatchError::ConfigError(format!(
                    "function '{}' has no handler",
                    name
                )));
            }
        };
        handlers.insert(name.clone(), handler.to_string());
    }
    Ok(handlers)
}

fn validate_watch_includes(includes: &[String]) -> Result<()> {
    if includes.iter().any(|p| p.trim().is_empty()) {
        return Err(SlswatchError::ConfigError(
            "custom.serverlessWatch.includes must not contain empty paths".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{CustomSection, FunctionConfig, WatchSettings};

    fn raw_with(functions: &[(&str, Option<&str>)]) -> RawServiceMetadata {
        RawServiceMetadata {
            service: Some("svc".to_string()),
            functions: functions
                .iter()
                .map(|(name, handler)| {
                    (
                        name.to_string(),
                        FunctionConfig {
                            handler: handler.map(str::to_string),
                        },
                    )
                })
                .collect(),
            custom: CustomSection::default(),
        }
    }

    #[test]
    fn rejects_service_without_functions() {
        let err = ServiceMetadata::from_raw(raw_with(&[]), "/svc", "serverless.yml").unwrap_err();
        assert!(matches!(err, SlswatchError::ConfigError(msg) if msg.contains("at least one")));
    }

    #[test]
    fn rejects_function_without_handler() {
        let raw = raw_with(&[("hello", Some("src/index.handler")), ("image", None)]);
        let err = ServiceMetadata::from_raw(raw, "/svc", "serverless.yml").unwrap_err();
        assert!(matches!(err, SlswatchError::ConfigError(msg) if msg.contains("'image'")));
    }

    #[test]
    fn keeps_watch_includes_in_declaration_order() {
        let mut raw = raw_with(&[("hello", Some("src/index.handler"))]);
        raw.custom.serverless_watch = Some(WatchSettings {
            includes: vec!["src".to_string(), "lib/shared".to_string()],
        });

        let meta = ServiceMetadata::from_raw(raw, "/svc", "serverless.yml").unwrap();
        assert_eq!(meta.watch_includes(), ["src", "lib/shared"]);
        assert_eq!(
            meta.handlers().get("hello").map(String::as_str),
            Some("src/index.handler")
        );
        assert_eq!(meta.service(), Some("svc"));
    }

    #[test]
    fn rejects_blank_watch_include() {
        let mut raw = raw_with(&[("hello", Some("src/index.handler"))]);
        raw.custom.serverless_watch = Some(WatchSettings {
            includes: vec!["  ".to_string()],
        });
        assert!(ServiceMetadata::from_raw(raw, "/svc", "serverless.yml").is_err());
    }
}
