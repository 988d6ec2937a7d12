//! Content digest primitives.
//!
//! Digests are tagged with their algorithm (`sha256:<hex>`) and depend only
//! on the asset bytes, never on filename or call context. The fallback
//! classifier reduces the leading digest bytes to pick a verdict bucket, so
//! both operations must stay bit-stable across runs and processes.

use crate::infra::error::{PipelineError, PipelineResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Algorithm tag prefixed to every digest string.
pub const DIGEST_PREFIX: &str = "sha256:";

/// Compute the tagged content digest of a byte sequence.
#[must_use]
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    format!("{DIGEST_PREFIX}{}", hex_encode(&digest))
}

/// Compute the tagged content digest of a file.
///
/// # Errors
///
/// Returns `AssetUnreadable` if the file cannot be read; never a partial
/// digest.
pub fn file_digest<P: AsRef<Path>>(path: P) -> PipelineResult<String> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| {
        PipelineError::AssetUnreadable(format!("{}: {}", path.as_ref().display(), e))
    })?;
    Ok(content_digest(&bytes))
}

/// Reduce a tagged digest to its leading 32 bits.
///
/// Parses the first 8 hex characters of the digest body as a big-endian
/// unsigned integer; the simulator reduces this modulo the verdict set.
/// Returns `None` for strings that do not carry a hex digest body.
#[must_use]
pub fn digest_bucket(digest: &str) -> Option<u32> {
    let body = digest.strip_prefix(DIGEST_PREFIX).unwrap_or(digest);
    let head = body.get(..8)?;
    u32::from_str_radix(head, 16).ok()
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
