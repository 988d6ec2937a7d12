//! External tool invocation adapter.
//!
//! Runs the configured verification/signing executable as a subprocess and
//! captures its exit code and output as plain text. The invoker performs no
//! interpretation of the tool's semantics: a non-zero exit code is an
//! ordinary return value, and only failures to execute at all (missing
//! binary, spawn error, timeout) surface as errors for the orchestrator to
//! absorb.

use crate::infra::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run-and-capture capability for the external signing tool.
///
/// Modeled as a trait object so tests can drive the orchestrator with
/// scripted outputs instead of real processes.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Execute the tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns `ToolUnavailable` when the binary cannot be found and
    /// `ToolExecutionFailed` when the process cannot be spawned, crashes
    /// before producing a status, or exceeds its execution bound. A tool
    /// that runs to completion never errors here, whatever its exit code.
    async fn run(&self, args: &[String]) -> PipelineResult<ToolOutput>;
}

/// Subprocess-backed invoker with a bounded execution time.
pub struct CommandInvoker {
    bin: String,
    timeout: Duration,
}

impl CommandInvoker {
    #[must_use]
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn bin(&self) -> &str {
        &self.bin
    }
}

#[async_trait]
impl ToolInvoker for CommandInvoker {
    async fn run(&self, args: &[String]) -> PipelineResult<ToolOutput> {
        log::debug!("invoking {} {:?}", self.bin, args);

        let mut command = tokio::process::Command::new(&self.bin);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A dropped future (caller timeout or cancellation) must not
            // leave the tool running.
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::ToolUnavailable(format!("{} not found", self.bin))
            } else {
                PipelineError::ToolExecutionFailed(format!("failed to spawn {}: {e}", self.bin))
            }
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                PipelineError::ToolExecutionFailed(format!(
                    "{} timed out after {}s",
                    self.bin,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                PipelineError::ToolExecutionFailed(format!("{} did not complete: {e}", self.bin))
            })?;

        let result = ToolOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!("{} exited with code {}", self.bin, result.exit_code);
        Ok(result)
    }
}
