// src/dispatch/options.rs

//! Per-call deploy requests built from the user's CLI options.

use crate::types::FunctionName;

/// User-supplied options forwarded to every deploy.
///
/// Only this whitelist is ever forwarded; the watcher's own flags stay local.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedOptions {
    pub stage: Option<String>,
    pub config: Option<String>,
    pub function: Option<FunctionName>,
    pub verbose: bool,
}

impl ForwardedOptions {
    /// Render as CLI flags, in a fixed order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(stage) = &self.stage {
            args.push("--stage".to_string());
            args.push(stage.clone());
        }
        if let Some(config) = &self.config {
            args.push("--config".to_string());
            args.push(config.clone());
        }
        if let Some(function) = &self.function {
            args.push("--function".to_string());
            args.push(function.clone());
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }
        args
    }
}

/// One "deploy a single function" invocation.
///
/// Built fresh for every call so concurrent fan-out members never share the
/// injected `function`/`force`/`update_config` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeployRequest {
    pub function: FunctionName,
    pub force: bool,
    pub update_config: bool,
    pub options: ForwardedOptions,
}

impl FunctionDeployRequest {
    pub fn new(function: impl Into<FunctionName>, options: &ForwardedOptions) -> Self {
        Self {
            function: function.into(),
            force: true,
            update_config: false,
            options: options.clone(),
        }
    }

    /// Arguments for `<bin> deploy function ...`.
    ///
    /// The request's own `function` replaces any forwarded `--function`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "deploy".to_string(),
            "function".to_string(),
            "--function".to_string(),
            self.function.clone(),
        ];
        if self.force {
            args.push("--force".to_string());
        }
        if self.update_config {
            args.push("--update-config".to_string());
        }
        let forwarded = ForwardedOptions {
            function: None,
            ..self.options.clone()
        };
        args.extend(forwarded.to_args());
        args
    }
}

/// The out-of-process full-service deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeployCommand {
    args: Vec<String>,
}

impl ServiceDeployCommand {
    pub fn new(options: &ForwardedOptions) -> Self {
        let mut args = vec!["deploy".to_string(), "--force".to_string()];
        args.extend(options.to_args());
        Self { args }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ForwardedOptions {
        ForwardedOptions {
            stage: Some("dev".to_string()),
            config: Some("serverless.ts".to_string()),
            function: None,
            verbose: true,
        }
    }

    #[test]
    fn service_deploy_forces_and_forwards() {
        let cmd = ServiceDeployCommand::new(&opts());
        assert_eq!(
            cmd.args(),
            [
                "deploy", "--force", "--stage", "dev", "--config", "serverless.ts", "--verbose"
            ]
        );
    }

    #[test]
    fn service_deploy_without_options() {
        let cmd = ServiceDeployCommand::new(&ForwardedOptions::default());
        assert_eq!(cmd.args(), ["deploy", "--force"]);
    }

    #[test]
    fn function_request_injects_flags() {
        let req = FunctionDeployRequest::new("hello", &opts());
        assert!(req.force);
        assert!(!req.update_config);
        assert_eq!(
            req.to_args(),
            [
                "deploy", "function", "--function", "hello", "--force", "--stage", "dev",
                "--config", "serverless.ts", "--verbose"
            ]
        );
    }

    #[test]
    fn function_request_overrides_scoped_function() {
        let options = ForwardedOptions {
            function: Some("other".to_string()),
            ..ForwardedOptions::default()
        };
        let args = FunctionDeployRequest::new("hello", &options).to_args();
        assert_eq!(args, ["deploy", "function", "--function", "hello", "--force"]);
        assert_eq!(options.function.as_deref(), Some("other"));
    }
}
