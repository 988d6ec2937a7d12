//! Provenance Verifier Library
//!
//! A self-contained library for asset provenance verification: callers
//! submit a local file (or fetch a remote one) and receive a trust verdict
//! about its origin. Real cryptographic validation is delegated to an
//! external signing tool; when the tool or its key material is unavailable
//! the pipeline falls back to a deterministic, content-derived classifier,
//! so every call terminates in a structured verdict and no internal error
//! ever surfaces as a fatal failure.

pub mod adapters;
pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

use std::path::Path;

pub use adapters::{CommandInvoker, FetchError, LocalStore, RemoteFetcher, ToolInvoker, ToolOutput};
pub use domain::types::FetchUrl;
pub use domain::verdict::{ChainStatus, TrustState, VerificationReport};
pub use infra::config::{ConfigManager, FetchLimits, VerifierConfig};
pub use infra::error::{PipelineError, PipelineResult};
pub use pipelines::{SignWorkflow, VerifyWorkflow};
pub use services::{SignOutcome, SigningService, Simulator, VerificationResponse, VerificationService};

/// Verify a local asset using configuration from the environment.
///
/// The sole verification entry point for embedding callers: always
/// resolves to a report, never errors.
pub async fn verify_asset<P: AsRef<Path>>(path: P) -> VerificationReport {
    let config = VerifierConfig::from_env();
    VerifyWorkflow::new(config).run(path.as_ref()).await
}

/// Produce a signed copy of an asset using configuration from the
/// environment.
///
/// Best-effort: on any failure some file still lands at `output_path`
/// (degrading to a plain copy, then a placeholder), and the returned
/// outcome names the tier that produced it.
pub async fn sign_asset<P: AsRef<Path>>(
    input_path: P,
    output_path: P,
    manifest_path: Option<&Path>,
) -> SignOutcome {
    let config = VerifierConfig::from_env();
    SignWorkflow::new(config)
        .run(input_path.as_ref(), output_path.as_ref(), manifest_path)
        .await
}
