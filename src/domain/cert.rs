//! Certificate material helpers.
//!
//! Certificate bytes are opaque to this pipeline: no path validation or
//! revocation checking happens here. What the pipeline does need is a short
//! fingerprint for the UI layer, computed over the decoded DER bytes so it
//! is independent of PEM line wrapping.

use crate::domain::hash::content_digest;
use crate::infra::error::{PipelineError, PipelineResult};
use base64::Engine;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Decode a PEM certificate to its DER bytes.
///
/// # Errors
///
/// Returns `CertificateError` when the armor is missing or the body is not
/// valid base64.
pub fn pem_to_der(pem: &str) -> PipelineResult<Vec<u8>> {
    let trimmed = pem.trim();
    if !trimmed.contains(PEM_BEGIN) {
        return Err(PipelineError::CertificateError(
            "Missing PEM certificate armor".to_string(),
        ));
    }
    let body: String = trimmed
        .replace(PEM_BEGIN, "")
        .replace(PEM_END, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let der = base64::engine::general_purpose::STANDARD.decode(body)?;
    Ok(der)
}

/// Compute the `sha256:<hex>` thumbprint of a PEM certificate.
///
/// The digest runs over the decoded DER bytes, independent of the asset's
/// own content hash.
///
/// # Errors
///
/// Returns `CertificateError` for undecodable PEM input.
pub fn thumbprint(pem: &str) -> PipelineResult<String> {
    let der = pem_to_der(pem)?;
    Ok(content_digest(&der))
}

/// Extract the first PEM certificate block from free-form tool output.
///
/// Used by the text normalization path, where certificate material may be
/// embedded in stdout rather than a structured field.
#[must_use]
pub fn extract_pem_block(text: &str) -> Option<String> {
    let start = text.find(PEM_BEGIN)?;
    let end_marker = text[start..].find(PEM_END)?;
    let end = start + end_marker + PEM_END.len();
    Some(text[start..end].to_string())
}
