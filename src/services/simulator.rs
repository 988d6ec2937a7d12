//! Deterministic fallback classifier.
//!
//! When real tooling is unavailable the pipeline still has to produce a
//! believable, reproducible verdict so downstream consumers and tests get
//! stable behavior. The verdict is derived from the asset's declared name
//! (explicit markers win) or from its content digest, so the same bytes
//! classify identically across runs and processes.

use crate::domain::hash::{content_digest, digest_bucket};
use crate::domain::verdict::{ChainStatus, TrustState, VerificationReport};
use serde_json::json;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Placeholder issuer attached to simulated signed verdicts.
const SIMULATED_ISSUER: &str = "Example Content Authority (Test)";

/// Issuer shown when the simulator picks the unknown bucket.
const UNKNOWN_ISSUER: &str = "Unknown Signer";

/// Placeholder manifest pointer for simulated verified assets.
const SIMULATED_MANIFEST_URL: &str = "https://trust.example.org/manifests/demo.json";

/// Placeholder certificate. The body is valid base64 so thumbprint
/// derivation works on simulated verdicts exactly as on real ones.
pub const SIMULATED_CERT_PEM: &str = "-----BEGIN CERTIFICATE-----\n\
c2ltdWxhdGVkIHByb3ZlbmFuY2UgY2VydGlmaWNhdGUgLSBub3QgZm9yIHJlYWwgdXNl\n\
-----END CERTIFICATE-----";

/// The ordered verdict set the digest bucket reduces into.
const STATES: [TrustState; 3] = [TrustState::Verified, TrustState::Failed, TrustState::Unknown];

/// Deterministic, content-derived verdict generator.
pub struct Simulator;

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify an asset without building a full report.
    ///
    /// Filename markers (`verified`, `tampered`/`failed`, `unknown`) take
    /// precedence; otherwise the leading digest bytes select a bucket.
    /// Unreadable bytes classify as `Unknown` (fail closed).
    #[must_use]
    pub fn classify(&self, path: &Path) -> TrustState {
        if let Some(state) = Self::state_from_name(path) {
            return state;
        }
        match std::fs::read(path) {
            Ok(bytes) => Self::state_from_bytes(&bytes),
            Err(_) => TrustState::Unknown,
        }
    }

    /// Produce a complete simulated verdict for an asset.
    #[must_use]
    pub fn simulate(&self, path: &Path) -> VerificationReport {
        let file_name = Self::display_name(path);

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Fail closed: a structured unknown verdict, never an error.
                return VerificationReport::unreadable(
                    format!("Simulator could not read \"{file_name}\": {e}"),
                    json!({ "simulator": true, "fileName": file_name, "error": e.to_string() }),
                );
            }
        };

        let asset_hash = content_digest(&bytes);
        let state = Self::state_from_name(path)
            .unwrap_or_else(|| Self::state_from_bytes_digest(&asset_hash));
        let now = Self::now_rfc3339();

        let (issuer, chain, cert_pem, manifest_url) = match state {
            TrustState::Verified => (
                SIMULATED_ISSUER,
                ChainStatus::Valid,
                Some(SIMULATED_CERT_PEM.to_string()),
                Some(SIMULATED_MANIFEST_URL.to_string()),
            ),
            TrustState::Failed => (
                SIMULATED_ISSUER,
                ChainStatus::Valid,
                Some(SIMULATED_CERT_PEM.to_string()),
                None,
            ),
            TrustState::Unknown => (UNKNOWN_ISSUER, ChainStatus::Missing, None, None),
        };

        VerificationReport {
            state,
            issuer: Some(issuer.to_string()),
            signed_at: now.clone(),
            chain,
            asset_hash: Some(asset_hash),
            manifest_url,
            cert_pem,
            messages: vec![format!(
                "Simulator mode: file \"{file_name}\" classified as {state}"
            )],
            raw: json!({
                "simulator": true,
                "fileName": file_name,
                "state": state.as_str(),
                "timestamp": now,
            }),
        }
    }

    fn state_from_name(path: &Path) -> Option<TrustState> {
        let name = Self::display_name(path).to_lowercase();
        if name.contains("verified") {
            Some(TrustState::Verified)
        } else if name.contains("tampered") || name.contains("failed") {
            Some(TrustState::Failed)
        } else if name.contains("unknown") {
            Some(TrustState::Unknown)
        } else {
            None
        }
    }

    fn state_from_bytes(bytes: &[u8]) -> TrustState {
        Self::state_from_bytes_digest(&content_digest(bytes))
    }

    fn state_from_bytes_digest(digest: &str) -> TrustState {
        let bucket = digest_bucket(digest).unwrap_or(0);
        STATES[(bucket % 3) as usize]
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    fn now_rfc3339() -> Option<String> {
        OffsetDateTime::now_utc().format(&Rfc3339).ok()
    }
}
