//! Remote asset fetch adapter.
//!
//! Downloads a remote asset into memory under hard bounds: connect and
//! request timeouts, a redirect cap, and a streaming byte limit. Failures
//! carry a classified reason so callers can report them without inspecting
//! transport internals.

use crate::domain::types::FetchUrl;
use crate::infra::config::FetchLimits;
use crate::infra::error::{PipelineError, PipelineResult};
use std::time::Duration;
use thiserror::Error;

/// Classified download failure.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Host not found - check the URL")]
    HostNotFound,

    #[error("Connection refused by server")]
    Refused,

    #[error("Request timed out")]
    TimedOut,

    #[error("File too large: more than {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("HTTP {0}: request failed")]
    BadStatus(u16),

    #[error("Empty response from server")]
    Empty,

    #[error("Network error: {0}")]
    Other(String),
}

impl From<FetchError> for PipelineError {
    fn from(error: FetchError) -> Self {
        PipelineError::NetworkFailure(error.to_string())
    }
}

/// Bounded HTTP downloader for remote assets.
pub struct RemoteFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl RemoteFetcher {
    /// Build a fetcher from the configured limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the HTTP client cannot be built.
    pub fn new(limits: &FetchLimits) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(limits.connect_timeout_seconds))
            .timeout(Duration::from_secs(limits.request_timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(limits.max_redirects))
            .user_agent("provenance-verifier/0.3")
            .build()
            .map_err(|e| {
                PipelineError::ConfigurationError(format!("HTTP client build failed: {e}"))
            })?;
        Ok(Self {
            client,
            max_bytes: limits.max_bytes,
        })
    }

    /// Download the asset at `url`, enforcing the byte cap while streaming.
    pub async fn fetch(&self, url: &FetchUrl) -> Result<Vec<u8>, FetchError> {
        log::debug!("fetching remote asset: {url}");

        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        // Reject oversized bodies up front when the origin declares a length.
        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            if buf.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        if buf.is_empty() {
            return Err(FetchError::Empty);
        }

        log::debug!("fetched {} bytes from {url}", buf.len());
        Ok(buf)
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::TimedOut;
    }
    if error.is_connect() {
        // reqwest does not expose DNS failures as a distinct kind; the
        // resolver error text is the only discriminator available.
        let chain = format!("{error:?}").to_lowercase();
        if chain.contains("dns") {
            return FetchError::HostNotFound;
        }
        return FetchError::Refused;
    }
    if error.is_redirect() {
        return FetchError::Other("Too many redirects".to_string());
    }
    FetchError::Other(error.to_string())
}
