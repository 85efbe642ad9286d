// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod feedback;
pub mod fs;
pub mod logging;
pub mod resolve;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::{build_catalog, Catalog};
use crate::cli::CliArgs;
use crate::config::{discover_configuration_filename, load_from_host, load_from_path, ServiceMetadata};
use crate::dispatch::{CliDeployBackend, DeployBackend, Dispatcher};
use crate::engine::{CoreLoop, Runtime, RuntimeEvent, RuntimeOptions};
use crate::feedback::TerminalFeedback;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - service metadata loading
/// - catalog construction (fails fast on an unknown `--function`)
/// - deploy backend + dispatcher
/// - file watcher
/// - Ctrl-C handling
/// - the change-loop runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let service_dir = fs.canonicalize(&args.service_dir)?;
    let forwarded = args.forwarded_options();

    let raw = match &args.metadata {
        Some(path) => load_from_path(path)?,
        None => load_from_host(&args.deploy_bin, &service_dir, &forwarded).await?,
    };
    let configuration_filename = discover_configuration_filename(fs.as_ref(), &service_dir);
    let meta = ServiceMetadata::from_raw(raw, service_dir.clone(), configuration_filename)?;

    let catalog = build_catalog(
        &meta,
        args.function.as_deref(),
        args.config.as_deref().map(Path::new),
    )?;

    if args.dry_run {
        print_dry_run(&meta, &catalog);
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Dropping the handle stops watching, so keep it until the runtime ends.
    let _watcher_handle = crate::watch::spawn_watcher(&catalog, Arc::clone(&fs), rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let backend: Arc<dyn DeployBackend> =
        Arc::new(CliDeployBackend::new(args.deploy_bin.clone(), service_dir));
    let dispatcher = Dispatcher::new(backend, forwarded, &catalog);

    info!(
        functions = catalog.targets().len(),
        watch_paths = catalog.watch_set().len(),
        "starting watch session"
    );

    let options = RuntimeOptions {
        service_failure: args.service_failure_policy(),
    };
    let feedback = TerminalFeedback::new(!args.no_clear);
    let runtime = Runtime::new(CoreLoop::new(catalog), rt_rx, dispatcher, feedback, options);
    runtime.run().await?;
    Ok(())
}

/// Print the resolved catalog without watching or deploying.
fn print_dry_run(meta: &ServiceMetadata, catalog: &Catalog) {
    println!("slswatch dry-run");
    if let Some(service) = meta.service() {
        println!("service: {service}");
    }
    print!("{catalog}");

    debug!("dry-run complete (no watching)");
}
