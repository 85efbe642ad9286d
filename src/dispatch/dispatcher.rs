// src/dispatch/dispatcher.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::dispatch::backend::DeployBackend;
use crate::dispatch::options::{ForwardedOptions, FunctionDeployRequest, ServiceDeployCommand};
use crate::errors::Result;
use crate::resolve::Resolution;
use crate::types::FunctionName;

/// Executes exactly one deploy strategy per resolution.
///
/// - `SingleTarget` deploys that function; a failure is logged, not returned.
/// - `ServiceConfig` runs the full-service deploy; a failure is returned.
/// - `Unmatched` deploys every catalog function concurrently and waits for
///   all of them; each failure is logged against its function.
pub struct Dispatcher {
    backend: Arc<dyn DeployBackend>,
    options: ForwardedOptions,
    functions: Vec<FunctionName>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn DeployBackend>,
        options: ForwardedOptions,
        catalog: &Catalog,
    ) -> Self {
        Self {
            backend,
            options,
            functions: catalog.target_names().map(str::to_string).collect(),
        }
    }

    pub async fn dispatch(&self, resolution: &Resolution) -> Result<()> {
        match resolution {
            Resolution::SingleTarget(function) => {
                self.deploy_function(function).await;
                Ok(())
            }
            Resolution::ServiceConfig => self.deploy_service().await,
            Resolution::Unmatched => {
                self.deploy_all_functions().await;
                Ok(())
            }
        }
    }

    async fn deploy_function(&self, function: &str) {
        let request = FunctionDeployRequest::new(function, &self.options);
        match self.backend.deploy_function(request).await {
            Ok(()) => info!(function = %function, "function deployed"),
            Err(err) => error!(function = %function, error = %err, "function deploy failed"),
        }
    }

    async fn deploy_service(&self) -> Result<()> {
        let command = ServiceDeployCommand::new(&self.options);
        self.backend.deploy_service(command).await?;
        info!("service deployed");
        Ok(())
    }

    async fn deploy_all_functions(&self) {
        let mut set = JoinSet::new();
        let mut names = HashMap::new();

        for function in &self.functions {
            let backend = Arc::clone(&self.backend);
            let request = FunctionDeployRequest::new(function.as_str(), &self.options);
            let handle = set.spawn(async move { backend.deploy_function(request).await });
            names.insert(handle.id(), function.clone());
        }

        let mut failed = 0usize;
        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((id, Ok(()))) => {
                    info!(function = %names[&id], "function deployed");
                }
                Ok((id, Err(err))) => {
                    failed += 1;
                    error!(function = %names[&id], error = %err, "function deploy failed");
                }
                Err(join_err) => {
                    failed += 1;
                    let function = names
                        .get(&join_err.id())
                        .map(String::as_str)
                        .unwrap_or("<unknown>");
                    error!(function = %function, error = %join_err, "function deploy task aborted");
                }
            }
        }

        info!(
            total = self.functions.len(),
            failed, "finished deploying all functions"
        );
    }
}
