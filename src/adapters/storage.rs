//! Local asset storage adapter.
//!
//! Stores asset bytes under a configured root directory and resolves
//! externally reachable URLs for stored paths. Storage is fail-fast: any
//! filesystem error propagates as a single structured `StorageFailure`,
//! never a crash.

use crate::infra::error::{PipelineError, PipelineResult};
use std::path::{Component, Path, PathBuf};

/// Filesystem-backed asset store.
pub struct LocalStore {
    root: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the root cannot be created.
    pub fn open(root: impl Into<PathBuf>, base_url: impl Into<String>) -> PipelineResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            PipelineError::StorageFailure(format!(
                "Failed to create storage root {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    /// Save bytes under a relative path, returning the absolute path.
    pub fn save(&self, rel: &str, bytes: &[u8]) -> PipelineResult<PathBuf> {
        let abs = self.resolve_rel(rel)?;
        if let Some(parent) = abs.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::StorageFailure(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        std::fs::write(&abs, bytes).map_err(|e| {
            PipelineError::StorageFailure(format!("Failed to write {}: {e}", abs.display()))
        })?;
        log::debug!("stored {} bytes at {}", bytes.len(), abs.display());
        Ok(abs)
    }

    /// Read bytes back from a relative path.
    pub fn read(&self, rel: &str) -> PipelineResult<Vec<u8>> {
        let abs = self.resolve_rel(rel)?;
        std::fs::read(&abs).map_err(|e| {
            PipelineError::StorageFailure(format!("Failed to read {}: {e}", abs.display()))
        })
    }

    /// Externally reachable URL for a stored path.
    #[must_use]
    pub fn resolve_url(&self, rel: &str) -> String {
        format!("{}/files/{rel}", self.base_url)
    }

    /// Content-addressed storage name: a short digest prefix plus the
    /// sanitized original file name, so repeated fetches of the same bytes
    /// land on the same path.
    #[must_use]
    pub fn addressed_name(digest: &str, original_name: &str) -> String {
        let body = digest.strip_prefix("sha256:").unwrap_or(digest);
        let short = body.get(..16).unwrap_or(body);
        let safe: String = Path::new(original_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string())
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            })
            .collect();
        format!("{short}-{safe}")
    }

    fn resolve_rel(&self, rel: &str) -> PipelineResult<PathBuf> {
        let rel_path = Path::new(rel);
        let escapes = rel_path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if rel.is_empty() || escapes {
            return Err(PipelineError::InvalidInput(format!(
                "Storage path must be relative and stay inside the store: {rel}"
            )));
        }
        Ok(self.root.join(rel_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalStore {
        LocalStore::open(dir.path().join("store"), "http://localhost:4000").unwrap()
    }

    #[test]
    fn save_and_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let abs = store.save("uploads/a/b.bin", b"payload").unwrap();
        assert!(abs.is_absolute() || abs.starts_with(dir.path()));
        assert_eq!(store.read("uploads/a/b.bin").unwrap(), b"payload");
    }

    #[test]
    fn resolve_url_uses_base() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(
            store.resolve_url("uploads/x.png"),
            "http://localhost:4000/files/uploads/x.png"
        );
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.save("../escape.bin", b"x").is_err());
        assert!(store.save("/etc/passwd", b"x").is_err());
        assert!(store.save("", b"x").is_err());
    }

    #[test]
    fn read_of_missing_path_is_storage_failure() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(matches!(
            store.read("nope.bin"),
            Err(PipelineError::StorageFailure(_))
        ));
    }

    #[test]
    fn addressed_name_is_stable_and_sanitized() {
        let digest = "sha256:0123456789abcdef0123456789abcdef";
        let name = LocalStore::addressed_name(digest, "weird name?.png");
        assert_eq!(name, "0123456789abcdef-weird_name_.png");
        // Same digest, same address
        assert_eq!(name, LocalStore::addressed_name(digest, "weird name?.png"));
    }
}
