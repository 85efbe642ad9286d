// src/dispatch/backend.rs

//! Pluggable deploy backend abstraction.
//!
//! The dispatcher talks to a `DeployBackend` instead of spawning processes
//! itself. Production uses [`CliDeployBackend`], which shells out to the
//! host CLI; tests provide a fake that records requests.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::dispatch::options::{FunctionDeployRequest, ServiceDeployCommand};
use crate::dispatch::runner::{run_function_deploy, run_service_deploy};
use crate::errors::Result;

/// Boxed future returned by backend calls.
pub type DeployFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// The external deploy primitive.
pub trait DeployBackend: Send + Sync {
    /// Deploy a single function. Errors are reported per function.
    fn deploy_function(&self, request: FunctionDeployRequest) -> DeployFuture<'_>;

    /// Deploy the whole service, with the operator watching its output.
    fn deploy_service(&self, command: ServiceDeployCommand) -> DeployFuture<'_>;
}

/// Backend that runs the host CLI (`serverless` by default).
#[derive(Debug, Clone)]
pub struct CliDeployBackend {
    bin: String,
    working_dir: PathBuf,
}

impl CliDeployBackend {
    pub fn new(bin: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            working_dir: working_dir.into(),
        }
    }
}

impl DeployBackend for CliDeployBackend {
    fn deploy_function(&self, request: FunctionDeployRequest) -> DeployFuture<'_> {
        Box::pin(run_function_deploy(&self.bin, &self.working_dir, request))
    }

    fn deploy_service(&self, command: ServiceDeployCommand) -> DeployFuture<'_> {
        Box::pin(run_service_deploy(&self.bin, &self.working_dir, command))
    }
}
