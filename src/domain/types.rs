//! Type-safe wrappers using new-type pattern
//!
//! This module provides type-safe wrappers for caller-supplied inputs to
//! prevent common errors and improve API safety.

use crate::infra::error::{PipelineError, PipelineResult};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for remote asset URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchUrl(String);

impl FetchUrl {
    /// Create a new FetchUrl after validation
    pub fn new(url: impl AsRef<str>) -> PipelineResult<Self> {
        let url = url.as_ref();
        Self::validate_url(url)?;
        Ok(FetchUrl(url.to_string()))
    }

    /// Get the URL as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that the URL is a plausible remote asset location
    fn validate_url(url: &str) -> PipelineResult<()> {
        // Must start with http:// or https://
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::InvalidInput(format!(
                "Asset URL must start with http:// or https://, got: {url}"
            )));
        }

        // Must have more content than just the protocol
        let without_protocol = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        if without_protocol.is_empty() {
            return Err(PipelineError::InvalidInput(
                "Asset URL has no host".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for FetchUrl {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for FetchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
