// src/dispatch/mod.rs

//! Deploy dispatch.
//!
//! - [`options`] builds per-call deploy requests from the forwarded CLI
//!   options.
//! - [`backend`] defines the `DeployBackend` seam and the CLI-backed
//!   production implementation.
//! - [`runner`] spawns the deploy processes.
//! - [`dispatcher`] maps a [`crate::resolve::Resolution`] to one strategy.

pub mod backend;
pub mod dispatcher;
pub mod options;
pub mod runner;

pub use backend::{CliDeployBackend, DeployBackend, DeployFuture};
pub use dispatcher::Dispatcher;
pub use options::{ForwardedOptions, FunctionDeployRequest, ServiceDeployCommand};
