// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::dispatch::ForwardedOptions;
use crate::types::ServiceFailurePolicy;

/// Command-line arguments for `slswatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "slswatch",
    version,
    about = "Watch a serverless service and redeploy what changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Only watch and deploy this function.
    #[arg(short = 'f', long, value_name = "NAME")]
    pub function: Option<String>,

    /// Path to the service config file; replaces the default in the watch set.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<String>,

    /// Stage to deploy to.
    #[arg(short = 's', long, value_name = "STAGE")]
    pub stage: Option<String>,

    /// Forward `--verbose` to every deploy.
    #[arg(long)]
    pub verbose: bool,

    /// Service root directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub service_dir: PathBuf,

    /// Read service metadata from a JSON/TOML snapshot instead of asking the
    /// host CLI (`<deploy-bin> print --format json`).
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Host CLI used for `print` and `deploy`.
    #[arg(long, value_name = "BIN", default_value = "serverless")]
    pub deploy_bin: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SLSWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build and print the catalog and watch set, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep watching after a failed full-service deploy instead of exiting.
    #[arg(long)]
    pub keep_watching: bool,

    /// Don't clear the terminal between deploys.
    #[arg(long)]
    pub no_clear: bool,
}

impl CliArgs {
    /// The options forwarded to the host deploy command.
    pub fn forwarded_options(&self) -> ForwardedOptions {
        ForwardedOptions {
            stage: self.stage.clone(),
            config: self.config.clone(),
            function: self.function.clone(),
            verbose: self.verbose,
        }
    }

    pub fn service_failure_policy(&self) -> ServiceFailurePolicy {
        if self.keep_watching {
            ServiceFailurePolicy::KeepWatching
        } else {
            ServiceFailurePolicy::Propagate
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_map_to_forwarded_options() {
        let args = CliArgs::try_parse_from([
            "slswatch", "-f", "hello", "-c", "serverless.ts", "-s", "prod", "--verbose",
        ])
        .unwrap();

        assert_eq!(
            args.forwarded_options(),
            ForwardedOptions {
                stage: Some("prod".to_string()),
                config: Some("serverless.ts".to_string()),
                function: Some("hello".to_string()),
                verbose: true,
            }
        );
        assert_eq!(args.service_failure_policy(), ServiceFailurePolicy::Propagate);
    }

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["slswatch", "--keep-watching"]).unwrap();
        assert_eq!(args.deploy_bin, "serverless");
        assert_eq!(args.service_dir, PathBuf::from("."));
        assert_eq!(args.forwarded_options(), ForwardedOptions::default());
        assert_eq!(args.service_failure_policy(), ServiceFailurePolicy::KeepWatching);
    }
}
