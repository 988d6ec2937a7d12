//! Error types for the verification pipeline.
//! Error handling types and result definitions for verify/sign operations.

use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Comprehensive error types for the verification pipeline.
///
/// Every variant here is caught at the orchestrator boundary and converted
/// into either a simulator fallback or a terminal `unknown` verdict; none
/// of them escape a `verify` call. Configuration errors are the exception:
/// they surface at startup, before any verification runs.
#[derive(Error, Debug, miette::Diagnostic)]
pub enum PipelineError {
    #[error("Asset unreadable: {0}")]
    AssetUnreadable(String),

    #[error("Signing tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Signing tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Signing tool output unparseable: {0}")]
    ToolOutputUnparseable(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        PipelineError::IoError(error.to_string())
    }
}

impl From<base64::DecodeError> for PipelineError {
    fn from(error: base64::DecodeError) -> Self {
        PipelineError::CertificateError(error.to_string())
    }
}
