//! Public verification response contract.
//!
//! The route layer consumes this shape rather than the internal report:
//! raw certificate PEM never travels outward, only its thumbprint, and a
//! stored asset's externally reachable URL is attached when known.

use crate::domain::cert::thumbprint;
use crate::domain::verdict::{ChainStatus, TrustState, VerificationReport};
use serde::Serialize;
use serde_json::Value;

/// Response mirror of [`VerificationReport`] for external consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub state: TrustState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
    pub chain: ChainStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_thumbprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
    pub messages: Vec<String>,
    pub raw: Value,
}

impl VerificationResponse {
    /// Build the public response from an internal report.
    #[must_use]
    pub fn from_report(report: VerificationReport, asset_url: Option<String>) -> Self {
        let cert_thumbprint = report
            .cert_pem
            .as_deref()
            .and_then(|pem| thumbprint(pem).ok());

        Self {
            state: report.state,
            issuer: report.issuer,
            signed_at: report.signed_at,
            chain: report.chain,
            asset_hash: report.asset_hash,
            manifest_url: report.manifest_url,
            cert_thumbprint,
            asset_url,
            messages: report.messages,
            raw: report.raw,
        }
    }

    /// Structured degraded response for collaborator failures (fetch or
    /// storage) that happen before verification could run.
    #[must_use]
    pub fn degraded(messages: Vec<String>, asset_url: Option<String>, raw: Value) -> Self {
        Self {
            state: TrustState::Unknown,
            issuer: None,
            signed_at: None,
            chain: ChainStatus::Missing,
            asset_hash: None,
            manifest_url: None,
            cert_thumbprint: None,
            asset_url,
            messages,
            raw,
        }
    }
}
