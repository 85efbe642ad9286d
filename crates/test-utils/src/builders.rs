#![allow(dead_code)]

use std::path::{Path, PathBuf};

use slswatch::catalog::{build_catalog, Catalog};
use slswatch::config::{
    CustomSection, FunctionConfig, RawServiceMetadata, ServiceMetadata, WatchSettings,
};

/// Builder for `ServiceMetadata` to simplify test setup.
pub struct ServiceMetadataBuilder {
    raw: RawServiceMetadata,
    service_dir: PathBuf,
    configuration_filename: String,
}

impl ServiceMetadataBuilder {
    pub fn new(service_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw: RawServiceMetadata {
                service: Some("test-service".to_string()),
                functions: Default::default(),
                custom: CustomSection::default(),
            },
            service_dir: service_dir.into(),
            configuration_filename: "serverless.yml".to_string(),
        }
    }

    pub fn function(mut self, name: &str, handler: &str) -> Self {
        self.raw.functions.insert(
            name.to_string(),
            FunctionConfig {
                handler: Some(handler.to_string()),
            },
        );
        self
    }

    pub fn include(mut self, path: &str) -> Self {
        self.raw
            .custom
            .serverless_watch
            .get_or_insert_with(WatchSettings::default)
            .includes
            .push(path.to_string());
        self
    }

    pub fn configuration_filename(mut self, name: &str) -> Self {
        self.configuration_filename = name.to_string();
        self
    }

    pub fn build_raw(self) -> RawServiceMetadata {
        self.raw
    }

    pub fn build(self) -> ServiceMetadata {
        ServiceMetadata::from_raw(self.raw, self.service_dir, self.configuration_filename)
            .expect("Failed to build valid metadata from builder")
    }

    /// Build an unscoped catalog with the default config path.
    pub fn catalog(self) -> Catalog {
        build_catalog(&self.build(), None, None).expect("Failed to build catalog from builder")
    }

    pub fn scoped_catalog(self, function: &str) -> Catalog {
        build_catalog(&self.build(), Some(function), None)
            .expect("Failed to build scoped catalog from builder")
    }

    pub fn catalog_with_config(self, config: &Path) -> Catalog {
        build_catalog(&self.build(), None, Some(config))
            .expect("Failed to build catalog from builder")
    }
}

/// The single-function service from the plugin's example project.
pub fn hello_service() -> ServiceMetadataBuilder {
    ServiceMetadataBuilder::new(".").function("hello", "src/index.handler")
}
