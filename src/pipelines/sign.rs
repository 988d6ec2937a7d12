//! `SignWorkflow` orchestrates best-effort signing.
//!
//! Thin facade over `SigningService`; keeps symmetry with the verify
//! workflow.

use crate::infra::config::VerifierConfig;
use crate::services::signing::{SignOutcome, SigningService};
use std::path::Path;
use std::sync::Arc;

pub struct SignWorkflow {
    svc: SigningService,
}

impl SignWorkflow {
    #[must_use]
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            svc: SigningService::new(Arc::new(config)),
        }
    }

    /// Sign `input` into `output`, degrading as needed. A file exists at
    /// `output` after every call.
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        manifest: Option<&Path>,
    ) -> SignOutcome {
        self.svc.sign(input, output, manifest).await
    }
}
