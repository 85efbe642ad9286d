// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SlswatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Function {0} not found")]
    FunctionNotFound(String),

    #[error("functions '{first}' and '{second}' share source path {path:?}")]
    DuplicateSourcePath {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("deploy of function '{function}' failed: {reason}")]
    FunctionDeployFailed { function: String, reason: String },

    #[error("service deploy failed: {0}")]
    ServiceDeployFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlswatchError {
    /// Whether this error means the session must not start.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SlswatchError::ConfigError(_)
                | SlswatchError::FunctionNotFound(_)
                | SlswatchError::DuplicateSourcePath { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SlswatchError>;
