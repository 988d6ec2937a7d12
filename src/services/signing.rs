//! Best-effort signing service.
//!
//! Produces a signed copy of an asset when real tooling is available, and
//! degrades gracefully when it is not: simulated signature, then a
//! byte-for-byte copy, then a placeholder file. Callers rely on a file
//! existing at the output path after every call, whatever happened.

use crate::adapters::tool::{CommandInvoker, ToolInvoker};
use crate::infra::config::VerifierConfig;
use crate::infra::error::{PipelineError, PipelineResult};
use std::path::Path;
use std::sync::Arc;

/// Trailer appended to simulated-signature copies.
const SIMULATED_TRAILER: &[u8] = b"\n# Simulated provenance signature\n";

/// Content of the last-resort placeholder file.
const PLACEHOLDER_CONTENT: &[u8] = b"# Provenance placeholder\n";

/// Which degradation tier produced the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutcome {
    /// The external tool signed the asset.
    SignedWithTool,
    /// Simulator mode: input bytes plus a simulated-signature trailer.
    SimulatedSignature,
    /// Tool failed; the output is an unsigned byte-for-byte copy.
    CopiedUnsigned,
    /// Even copying failed; a placeholder file was written.
    Placeholder,
}

/// Service producing signed (or best-effort) asset copies.
pub struct SigningService {
    config: Arc<VerifierConfig>,
    invoker: Box<dyn ToolInvoker>,
}

impl SigningService {
    /// Wire the service with the configured subprocess invoker.
    #[must_use]
    pub fn new(config: Arc<VerifierConfig>) -> Self {
        let invoker = CommandInvoker::new(config.tool_bin.clone(), config.tool_timeout());
        Self::with_invoker(config, Box::new(invoker))
    }

    /// Wire the service with a caller-supplied invoker.
    #[must_use]
    pub fn with_invoker(config: Arc<VerifierConfig>, invoker: Box<dyn ToolInvoker>) -> Self {
        Self { config, invoker }
    }

    /// Sign `input` into `output`. Never fails; the returned outcome names
    /// the tier that produced the file.
    pub async fn sign(
        &self,
        input: &Path,
        output: &Path,
        manifest: Option<&Path>,
    ) -> SignOutcome {
        if self.config.real_tooling_available() {
            match self.sign_with_tool(input, output, manifest).await {
                Ok(()) => return SignOutcome::SignedWithTool,
                Err(e) => {
                    log::warn!("tool signing failed, degrading to copy: {e}");
                    return self.degrade(input, output);
                }
            }
        }

        match write_with_trailer(input, output) {
            Ok(()) => SignOutcome::SimulatedSignature,
            Err(e) => {
                log::warn!("simulated signing failed, degrading to copy: {e}");
                self.degrade(input, output)
            }
        }
    }

    async fn sign_with_tool(
        &self,
        input: &Path,
        output: &Path,
        manifest: Option<&Path>,
    ) -> PipelineResult<()> {
        let mut args = vec![
            input.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
            "--sign".to_string(),
            self.config.sign_cert.display().to_string(),
            "--key".to_string(),
            self.config.sign_key.display().to_string(),
        ];
        if let Some(manifest) = manifest {
            args.push("-m".to_string());
            args.push(manifest.display().to_string());
        }

        let result = self.invoker.run(&args).await?;
        if !result.succeeded() {
            return Err(PipelineError::ToolExecutionFailed(format!(
                "signing tool exited with code {}: {}",
                result.exit_code,
                result.stderr.trim()
            )));
        }
        log::info!("signed {} into {}", input.display(), output.display());
        Ok(())
    }

    fn degrade(&self, input: &Path, output: &Path) -> SignOutcome {
        match copy_bytes(input, output) {
            Ok(()) => SignOutcome::CopiedUnsigned,
            Err(e) => {
                log::warn!("copy fallback failed, writing placeholder: {e}");
                if let Err(e) = std::fs::write(output, PLACEHOLDER_CONTENT) {
                    // Nothing further to degrade to.
                    log::error!("placeholder write failed: {e}");
                }
                SignOutcome::Placeholder
            }
        }
    }
}

fn write_with_trailer(input: &Path, output: &Path) -> PipelineResult<()> {
    let mut bytes = std::fs::read(input)
        .map_err(|e| PipelineError::AssetUnreadable(format!("{}: {e}", input.display())))?;
    bytes.extend_from_slice(SIMULATED_TRAILER);
    std::fs::write(output, bytes)
        .map_err(|e| PipelineError::IoError(format!("{}: {e}", output.display())))?;
    Ok(())
}

fn copy_bytes(input: &Path, output: &Path) -> PipelineResult<()> {
    let bytes = std::fs::read(input)
        .map_err(|e| PipelineError::AssetUnreadable(format!("{}: {e}", input.display())))?;
    std::fs::write(output, bytes)
        .map_err(|e| PipelineError::IoError(format!("{}: {e}", output.display())))?;
    Ok(())
}
