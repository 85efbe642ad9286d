// src/config/mod.rs

//! Service metadata loading and validation.
//!
//! Responsibilities:
//! - Define the serde-backed model of the host's resolved config (`model.rs`).
//! - Load a snapshot from disk or from the host CLI (`loader.rs`).
//! - Validate it into a read-only [`ServiceMetadata`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    discover_configuration_filename, load_from_host, load_from_path, parse_metadata,
};
pub use model::{
    CustomSection, FunctionConfig, RawServiceMetadata, ServiceMetadata, WatchSettings,
    DEFAULT_CONFIGURATION_FILENAME,
};
