//! Collaborator-boundary tests: local storage semantics and remote URL
//! validation.

use provenance_verifier::{FetchUrl, LocalStore, PipelineError};
use tempfile::TempDir;

#[test]
fn storage_roundtrip_and_url_resolution() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("assets"), "https://cdn.example.org").unwrap();

    let abs = store.save("uploads/2026/report.pdf", b"pdf bytes").unwrap();
    assert!(abs.ends_with("uploads/2026/report.pdf"));
    assert_eq!(store.read("uploads/2026/report.pdf").unwrap(), b"pdf bytes");
    assert_eq!(
        store.resolve_url("uploads/2026/report.pdf"),
        "https://cdn.example.org/files/uploads/2026/report.pdf"
    );
}

#[test]
fn storage_rejects_escaping_paths() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("assets"), "").unwrap();

    for bad in ["../outside.bin", "a/../../outside.bin", "/absolute.bin"] {
        match store.save(bad, b"x") {
            Err(PipelineError::InvalidInput(_)) => {}
            other => panic!("path {bad:?} should be rejected, got {other:?}"),
        }
    }
}

#[test]
fn storage_errors_are_structured() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("assets"), "").unwrap();

    assert!(matches!(
        store.read("never/saved.bin"),
        Err(PipelineError::StorageFailure(_))
    ));
}

#[test]
fn content_addressing_is_stable() {
    let digest = "sha256:deadbeefdeadbeefdeadbeefdeadbeef";
    let first = LocalStore::addressed_name(digest, "photo.jpg");
    let second = LocalStore::addressed_name(digest, "photo.jpg");
    assert_eq!(first, second);
    assert!(first.starts_with("deadbeefdeadbeef"));
    assert!(first.ends_with("photo.jpg"));
}

#[test]
fn fetch_url_validation() {
    assert!(FetchUrl::new("https://example.org/a.png").is_ok());
    assert!(FetchUrl::new("http://localhost:4000/a.png").is_ok());

    for bad in ["ftp://example.org/a", "javascript:alert(1)", "", "https://"] {
        match FetchUrl::new(bad) {
            Err(PipelineError::InvalidInput(_)) => {}
            other => panic!("url {bad:?} should be rejected, got {other:?}"),
        }
    }
}
