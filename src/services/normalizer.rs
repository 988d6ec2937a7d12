//! Tool output normalization.
//!
//! The external tool's schema is only loosely specified upstream, so field
//! extraction is an ordered list of strategies tried in sequence — first
//! non-empty match wins. This is a pure mapping layer: no I/O, no trust
//! decisions beyond the tie-break rules of the verdict contract.
//!
//! Tie-breaks for structured output:
//! - `state` is `Verified` only when the tool's own explicit validity flag
//!   is true; anything else maps to `Failed`, never silently to `Unknown`.
//! - `chain` defaults to `Valid` when the trust object is absent from a
//!   successful validation run.
//! - A verified verdict must carry certificate material and a valid chain;
//!   contradictory tool output (valid flag set, but no certificate or an
//!   explicitly revoked chain) downgrades to `Failed` with a message
//!   rather than dropping the tool's answer.

use crate::adapters::tool::ToolOutput;
use crate::domain::cert::extract_pem_block;
use crate::domain::verdict::{ChainStatus, TrustState, VerificationReport};
use serde_json::{json, Value};

/// Map structured tool JSON into the verdict contract.
#[must_use]
pub fn normalize_json(raw: Value, local_digest: Option<String>) -> VerificationReport {
    let claim = claim_object(&raw);

    let issuer = string_field(claim, &["issuer", "signedBy"])
        .unwrap_or_else(|| "Unknown issuer".to_string());
    let signed_at = string_field(claim, &["signedAt", "date"]);
    let asset_hash = string_field(&raw["asset"], &["hash"])
        .or_else(|| string_field(&raw, &["hash"]))
        .or(local_digest);
    let manifest_url = string_field(claim, &["manifest_url"]);
    let cert_pem = string_field(claim, &["certificate"]);

    let chain = raw["trust"]["state"]
        .as_str()
        .and_then(ChainStatus::parse)
        .unwrap_or(ChainStatus::Valid);

    let tool_says_valid = raw["valid"] == Value::Bool(true);

    let mut messages = Vec::new();
    let state = if tool_says_valid {
        if cert_pem.is_none() {
            messages.push(
                "Signing tool reported a valid signature but returned no certificate material"
                    .to_string(),
            );
            TrustState::Failed
        } else if chain != ChainStatus::Valid {
            messages.push(format!(
                "Signing tool reported a valid signature over a {} trust chain",
                match chain {
                    ChainStatus::Valid => "valid",
                    ChainStatus::Missing => "missing",
                    ChainStatus::Revoked => "revoked",
                }
            ));
            TrustState::Failed
        } else {
            TrustState::Verified
        }
    } else {
        TrustState::Failed
    };

    if state == TrustState::Failed && messages.is_empty() {
        messages.push("Signing tool reported the signature as invalid".to_string());
    }

    VerificationReport {
        state,
        issuer: Some(issuer),
        signed_at,
        chain,
        asset_hash,
        manifest_url,
        cert_pem,
        messages,
        raw,
    }
}

/// Map unstructured tool text into the verdict contract.
///
/// Returns `None` when the output carries no usable signal, in which case
/// the caller falls back to the simulator. A valid-signature marker counts
/// only when certificate material can also be extracted; without it the
/// verified-implies-certificate invariant could not hold.
#[must_use]
pub fn normalize_text(
    output: &ToolOutput,
    parse_error: &str,
    local_digest: Option<String>,
) -> Option<VerificationReport> {
    let raw = json!({
        "stdout": output.stdout,
        "stderr": output.stderr,
        "parseError": parse_error,
        "textFallback": true,
    });

    let marker = has_valid_marker(&output.stdout);
    let cert_pem =
        extract_pem_block(&output.stdout).or_else(|| extract_pem_block(&output.stderr));

    if marker {
        let cert_pem = cert_pem?;
        return Some(VerificationReport {
            state: TrustState::Verified,
            issuer: None,
            signed_at: None,
            chain: ChainStatus::Valid,
            asset_hash: local_digest,
            manifest_url: None,
            cert_pem: Some(cert_pem),
            messages: collect_output_lines(output),
            raw,
        });
    }

    if !output.stderr.trim().is_empty() {
        // An explicit complaint from the tool is an informative negative.
        return Some(VerificationReport {
            state: TrustState::Failed,
            issuer: None,
            signed_at: None,
            chain: ChainStatus::Missing,
            asset_hash: local_digest,
            manifest_url: None,
            cert_pem,
            messages: collect_output_lines(output),
            raw,
        });
    }

    None
}

/// Resolve the claim object across known schema shapes, first match wins.
fn claim_object(raw: &Value) -> &Value {
    let from_manifests = &raw["manifests"][0];
    if from_manifests.is_object() {
        return from_manifests;
    }
    let from_claim = &raw["claim"];
    if from_claim.is_object() {
        return from_claim;
    }
    &Value::Null
}

/// First non-empty string among the candidate keys.
fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value[*key]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Whether stdout contains an affirmative validity marker.
///
/// Token-based so that "Invalid" does not count as "valid".
fn has_valid_marker(stdout: &str) -> bool {
    let lower = stdout.to_lowercase();
    if lower.contains("signature valid") {
        return true;
    }
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "valid")
}

fn collect_output_lines(output: &ToolOutput) -> Vec<String> {
    [&output.stdout, &output.stderr]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
