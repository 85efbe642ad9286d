// src/dispatch/runner.rs

//! Deploy process runners.

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::dispatch::options::{FunctionDeployRequest, ServiceDeployCommand};
use crate::errors::{Result, SlswatchError};

/// Trailing stderr lines kept for the failure reason.
const STDERR_TAIL_LINES: usize = 20;

/// Run `<bin> deploy function ...` and stream its output into the log.
///
/// stdout and stderr lines are logged at info, tagged with the function so
/// concurrent fan-out output stays attributable. Both readers are drained
/// before this returns. A non-zero exit is a
/// [`SlswatchError::FunctionDeployFailed`] whose reason carries the tail of
/// stderr, where the host CLI reports what went wrong.
pub async fn run_function_deploy(
    bin: &str,
    working_dir: &Path,
    request: FunctionDeployRequest,
) -> Result<()> {
    let function = request.function.clone();
    let args = request.to_args();
    let failed = |reason: String| SlswatchError::FunctionDeployFailed {
        function: function.clone(),
        reason,
    };

    info!(function = %function, bin, ?args, "starting function deploy");

    let mut child = Command::new(bin)
        .args(&args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failed(format!("spawning `{bin}`: {e}")))?;

    let stdout_task = child.stdout.take().map(|stdout| {
        let name = function.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(function = %name, "{}", line);
            }
        })
    });

    let stderr_task = child.stderr.take().map(|stderr| {
        let name = function.clone();
        tokio::spawn(async move {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(function = %name, stream = "stderr", "{}", line);
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        })
    });

    let status = child
        .wait()
        .await
        .map_err(|e| failed(format!("waiting for `{bin}`: {e}")))?;

    if let Some(task) = stdout_task {
        if let Err(err) = task.await {
            debug!(function = %function, error = %err, "stdout reader ended abnormally");
        }
    }
    let stderr_tail = match stderr_task {
        Some(task) => task.await.unwrap_or_default(),
        None => VecDeque::new(),
    };

    info!(
        function = %function,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "function deploy exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(failed(failure_reason(bin, &status.to_string(), stderr_tail)))
    }
}

fn failure_reason(bin: &str, status: &str, stderr_tail: VecDeque<String>) -> String {
    let stderr: Vec<String> = stderr_tail
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    if stderr.is_empty() {
        format!("`{bin}` exited with {status}")
    } else {
        format!("`{bin}` exited with {status}: {}", stderr.join("\n"))
    }
}

/// Run `<bin> deploy --force ...` in the foreground.
///
/// The child inherits stdio so the operator sees the host's own progress
/// output uninterleaved; the call returns once the process has exited.
pub async fn run_service_deploy(
    bin: &str,
    working_dir: &Path,
    command: ServiceDeployCommand,
) -> Result<()> {
    info!(bin, args = ?command.args(), "starting service deploy");

    let status = Command::new(bin)
        .args(command.args())
        .current_dir(working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| SlswatchError::ServiceDeployFailed(format!("spawning `{bin}`: {e}")))?;

    info!(
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "service deploy exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(SlswatchError::ServiceDeployFailed(format!(
            "`{bin}` exited with {status}"
        )))
    }
}
