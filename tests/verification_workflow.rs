//! End-to-end tests for the verification workflow and its fallback tiers.

use provenance_verifier::{
    ChainStatus, TrustState, VerifierConfig, VerifyWorkflow,
};
use tempfile::TempDir;

fn write_asset(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Real-tool mode requires credential files on disk; create them.
fn forced_real_config(dir: &TempDir, tool_bin: &str) -> VerifierConfig {
    let mut config = VerifierConfig::default();
    config.simulator_mode = false;
    config.tool_bin = tool_bin.to_string();
    config.sign_cert = dir.path().join("sign.crt");
    config.sign_key = dir.path().join("sign.key");
    std::fs::write(&config.sign_cert, "cert").unwrap();
    std::fs::write(&config.sign_key, "key").unwrap();
    config
}

#[cfg(unix)]
fn write_tool_script(dir: &TempDir, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.path().join("fake-c2patool");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

#[tokio::test]
async fn nonexistent_path_yields_unknown_not_error() {
    let workflow = VerifyWorkflow::new(VerifierConfig::default());
    let report = workflow
        .run(std::path::Path::new("/no/such/dir/flyer.png"))
        .await;

    assert_eq!(report.state, TrustState::Unknown);
    assert_eq!(report.chain, ChainStatus::Missing);
    assert!(report.asset_hash.is_none());
    assert!(report.messages.iter().any(|m| m.contains("not found")));
}

#[tokio::test]
async fn missing_binary_in_real_mode_falls_back_to_simulator() {
    let dir = TempDir::new().unwrap();
    let config = forced_real_config(&dir, "definitely-not-installed-tool-9c1d");
    let path = write_asset(&dir, "press.verified.png", b"payload");

    let report = VerifyWorkflow::new(config).run(&path).await;

    // The simulator produced the verdict, and the marker filename decided it
    assert_eq!(report.state, TrustState::Verified);
    assert_eq!(report.raw["simulator"], true);
    assert!(report.is_consistent());
}

#[tokio::test]
async fn missing_credentials_disable_real_tooling() {
    let dir = TempDir::new().unwrap();
    let mut config = VerifierConfig::default();
    config.simulator_mode = false;
    config.sign_cert = dir.path().join("absent.crt");
    config.sign_key = dir.path().join("absent.key");
    // Binary that would fail loudly if spawned
    config.tool_bin = "false".to_string();

    let path = write_asset(&dir, "plain.bin", b"payload");
    let report = VerifyWorkflow::new(config).run(&path).await;

    assert_eq!(report.raw["simulator"], true);
}

#[cfg(unix)]
#[tokio::test]
async fn structured_tool_output_produces_verified_verdict() {
    let dir = TempDir::new().unwrap();
    let pem = "-----BEGIN CERTIFICATE----- ZmFrZSBkZXIgYnl0ZXM= -----END CERTIFICATE-----";
    let json = format!(
        r#"{{"valid": true, "manifests": [{{"issuer": "Scripted Issuer", "signedAt": "2026-04-01T00:00:00Z", "certificate": "{pem}"}}]}}"#
    );
    // printf keeps the payload byte-exact; echo may rewrite backslashes
    let tool = write_tool_script(&dir, &format!("printf '%s' '{json}'"));
    let config = forced_real_config(&dir, &tool);
    let path = write_asset(&dir, "asset.png", b"real bytes");

    let report = VerifyWorkflow::new(config).run(&path).await;

    assert_eq!(report.state, TrustState::Verified);
    assert_eq!(report.chain, ChainStatus::Valid);
    assert_eq!(report.issuer.as_deref(), Some("Scripted Issuer"));
    assert!(report.cert_pem.is_some());
    // Tool supplied no hash, so the locally computed digest fills in
    assert!(report
        .asset_hash
        .as_deref()
        .is_some_and(|h| h.starts_with("sha256:")));
    assert!(report.raw.get("simulator").is_none());
    assert!(report.is_consistent());
}

#[cfg(unix)]
#[tokio::test]
async fn failing_tool_exit_code_falls_back_to_simulator() {
    let dir = TempDir::new().unwrap();
    let tool = write_tool_script(&dir, "echo 'tool exploded' >&2; exit 7");
    let config = forced_real_config(&dir, &tool);
    let path = write_asset(&dir, "asset.png", b"real bytes");

    let report = VerifyWorkflow::new(config).run(&path).await;

    assert_eq!(report.raw["simulator"], true);
    assert!(report.is_consistent());
}

#[cfg(unix)]
#[tokio::test]
async fn garbage_tool_output_falls_back_to_simulator() {
    let dir = TempDir::new().unwrap();
    let tool = write_tool_script(&dir, "echo 'not json and no marker'");
    let config = forced_real_config(&dir, &tool);
    let path = write_asset(&dir, "asset.png", b"real bytes");

    let report = VerifyWorkflow::new(config).run(&path).await;

    assert_eq!(report.raw["simulator"], true);
}

#[tokio::test]
async fn response_carries_thumbprint_never_pem() {
    let dir = TempDir::new().unwrap();
    let path = write_asset(&dir, "flyer.verified.png", b"payload");

    let workflow = VerifyWorkflow::new(VerifierConfig::default());
    let response = workflow.run_with_response(&path, None).await;

    assert_eq!(response.state, TrustState::Verified);
    assert!(response
        .cert_thumbprint
        .as_deref()
        .is_some_and(|t| t.starts_with("sha256:")));

    let rendered = serde_json::to_string(&response).unwrap();
    assert!(!rendered.contains("BEGIN CERTIFICATE"));
}
