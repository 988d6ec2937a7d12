//! Verdict domain types for asset provenance verification.
//!
//! Aggregates the outcome of one verification attempt; tool invocation and
//! simulator mechanics are delegated to the service layer. This keeps the
//! domain layer free of I/O while providing a stable reporting contract to
//! higher level workflows.

use serde::Serialize;
use serde_json::Value;

/// Overall trust verdict for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustState {
    /// The signing tool's own validity flag was explicitly true.
    Verified,
    /// A signature was found but did not validate (an explicit negative).
    Failed,
    /// No signature, no signer, or no usable information.
    Unknown,
}

impl TrustState {
    /// Stable lowercase name, matching the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustState::Verified => "verified",
            TrustState::Failed => "failed",
            TrustState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TrustState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust-path status of the certificate backing a signature.
///
/// `Missing` is the safe default when no certificate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainStatus {
    Valid,
    Missing,
    Revoked,
}

impl ChainStatus {
    /// Parse a tool-reported chain state; anything unrecognized is `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "valid" => Some(ChainStatus::Valid),
            "missing" => Some(ChainStatus::Missing),
            "revoked" => Some(ChainStatus::Revoked),
            _ => None,
        }
    }
}

/// Result of one verification attempt.
///
/// Created fresh per call, never mutated after being returned, and not
/// persisted by the pipeline. `raw` carries the audit payload (tool output,
/// parse diagnostics, simulator metadata) and is never consulted for trust
/// decisions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
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
    pub cert_pem: Option<String>,
    pub messages: Vec<String>,
    pub raw: Value,
}

impl VerificationReport {
    /// Terminal `unknown` verdict for an asset whose bytes could not be
    /// obtained at all. No hash is claimed.
    #[must_use]
    pub fn unreadable(message: impl Into<String>, raw: Value) -> Self {
        Self {
            state: TrustState::Unknown,
            issuer: None,
            signed_at: None,
            chain: ChainStatus::Missing,
            asset_hash: None,
            manifest_url: None,
            cert_pem: None,
            messages: vec![message.into()],
            raw,
        }
    }

    /// Append a diagnostic message. Messages are append-only.
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Check the report against the contract invariants:
    /// a verified state implies a valid chain and certificate material,
    /// and any non-verified state carries at least one message.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self.state {
            TrustState::Verified => {
                self.chain == ChainStatus::Valid && self.cert_pem.is_some()
            }
            _ => !self.messages.is_empty(),
        }
    }
}
