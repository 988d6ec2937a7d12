//! `VerifyWorkflow`: high-level facade for asset verification.
//!
//! Delegates to `VerificationService`; keeps symmetry with the sign
//! workflow. The URL entry point additionally drives the fetch and storage
//! collaborators, degrading every one of their failures to a structured
//! unknown response.

use crate::adapters::fetch::RemoteFetcher;
use crate::adapters::storage::LocalStore;
use crate::domain::hash::content_digest;
use crate::domain::types::FetchUrl;
use crate::domain::verdict::VerificationReport;
use crate::infra::config::VerifierConfig;
use crate::services::response::VerificationResponse;
use crate::services::verification::VerificationService;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Orchestrates verification for local and remote assets.
pub struct VerifyWorkflow {
    config: Arc<VerifierConfig>,
    svc: VerificationService,
}

impl VerifyWorkflow {
    #[must_use]
    pub fn new(config: VerifierConfig) -> Self {
        let config = Arc::new(config);
        Self {
            svc: VerificationService::new(Arc::clone(&config)),
            config,
        }
    }

    /// Verify a local asset. Always resolves to a report.
    pub async fn run(&self, path: &Path) -> VerificationReport {
        self.svc.verify(path).await
    }

    /// Verify a local asset and shape the public response.
    pub async fn run_with_response(
        &self,
        path: &Path,
        asset_url: Option<String>,
    ) -> VerificationResponse {
        VerificationResponse::from_report(self.svc.verify(path).await, asset_url)
    }

    /// Fetch a remote asset, store it content-addressed, and verify it.
    ///
    /// Fetch and storage failures never escape: each maps to a degraded
    /// unknown response naming the failure.
    pub async fn run_url(&self, url: &FetchUrl) -> VerificationResponse {
        let asset_url = Some(url.to_string());

        let fetcher = match RemoteFetcher::new(&self.config.fetch) {
            Ok(fetcher) => fetcher,
            Err(e) => {
                return VerificationResponse::degraded(
                    vec!["Unable to initialize remote fetch".to_string(), e.to_string()],
                    asset_url,
                    json!({ "error": "Fetch setup failed" }),
                );
            }
        };

        let bytes = match fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("fetch failed for {url}: {e}");
                return VerificationResponse::degraded(
                    vec!["Unable to fetch file from URL".to_string(), e.to_string()],
                    asset_url,
                    json!({ "error": "Fetch failed", "url": url.as_str() }),
                );
            }
        };

        let store = match LocalStore::open(&self.config.storage_dir, &self.config.base_url) {
            Ok(store) => store,
            Err(e) => {
                return VerificationResponse::degraded(
                    vec!["Unable to save fetched file".to_string(), e.to_string()],
                    asset_url,
                    json!({ "error": "Storage error" }),
                );
            }
        };

        let digest = content_digest(&bytes);
        let original_name = url
            .as_str()
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("remote-asset");
        let rel = format!("fetch/{}", LocalStore::addressed_name(&digest, original_name));

        let abs = match store.save(&rel, &bytes) {
            Ok(abs) => abs,
            Err(e) => {
                return VerificationResponse::degraded(
                    vec!["Unable to save fetched file".to_string(), e.to_string()],
                    asset_url,
                    json!({ "error": "Storage error" }),
                );
            }
        };

        VerificationResponse::from_report(self.svc.verify(&abs).await, asset_url)
    }
}
