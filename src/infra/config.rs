//! Configuration management infrastructure.
//!
//! This module provides configuration file support for the verification
//! pipeline: the external tool binary, signing credential paths, simulator
//! mode, and the bounds applied to subprocess and network operations.
//!
//! Configuration is read once at process start and treated as immutable for
//! the lifetime of the pipeline; the services receive it by shared reference.

use crate::infra::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bounds applied to remote asset downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchLimits {
    /// Hard cap on downloaded bytes
    pub max_bytes: u64,

    /// Connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// Whole-request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_bytes: 15 * 1024 * 1024,
            connect_timeout_seconds: 8,
            request_timeout_seconds: 15,
            max_redirects: 3,
        }
    }
}

/// Pipeline configuration with all verification and signing preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// External verification/signing tool binary
    pub tool_bin: String,

    /// Signing certificate path (required for real tooling)
    pub sign_cert: PathBuf,

    /// Signing key path (required for real tooling)
    pub sign_key: PathBuf,

    /// Whether to force the deterministic simulator
    pub simulator_mode: bool,

    /// Upper bound on a single tool invocation, in seconds
    pub tool_timeout_seconds: u64,

    /// Root directory for stored assets
    pub storage_dir: PathBuf,

    /// External base URL under which stored assets are reachable
    pub base_url: String,

    /// Remote download bounds
    pub fetch: FetchLimits,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            tool_bin: "c2patool".to_string(),
            sign_cert: PathBuf::from("./keys/sign.crt"),
            sign_key: PathBuf::from("./keys/sign.key"),
            simulator_mode: true, // deterministic verdicts unless explicitly disabled
            tool_timeout_seconds: 20,
            storage_dir: PathBuf::from("storage"),
            base_url: String::new(),
            fetch: FetchLimits::default(),
        }
    }
}

impl VerifierConfig {
    /// Build a configuration from defaults plus environment overrides.
    ///
    /// Recognized variables: `C2PA_BIN`, `SIGN_CERT`, `SIGN_KEY`,
    /// `PV_SIMULATOR` (`0` disables the simulator), `STORAGE_DIR`,
    /// `BASE_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(bin) = std::env::var("C2PA_BIN") {
            config.tool_bin = bin;
        }
        if let Ok(cert) = std::env::var("SIGN_CERT") {
            config.sign_cert = PathBuf::from(cert);
        }
        if let Ok(key) = std::env::var("SIGN_KEY") {
            config.sign_key = PathBuf::from(key);
        }
        if let Ok(flag) = std::env::var("PV_SIMULATOR") {
            config.simulator_mode = flag != "0";
        }
        if let Ok(dir) = std::env::var("STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Ok(base) = std::env::var("BASE_URL") {
            config.base_url = base;
        }
        config
    }

    /// Whether a real tool invocation is worth attempting.
    ///
    /// Requires the simulator flag off and both credential files on disk;
    /// checked before any subprocess is spawned.
    #[must_use]
    pub fn real_tooling_available(&self) -> bool {
        !self.simulator_mode && self.sign_cert.exists() && self.sign_key.exists()
    }

    /// Subprocess execution bound.
    #[must_use]
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_seconds)
    }
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    pub fn new() -> PipelineResult<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PipelineResult<PathBuf> {
        // Try to get the user's config directory
        if let Some(config_dir) = dirs::config_dir() {
            let verifier_dir = config_dir.join("provenance-verifier");
            Ok(verifier_dir.join("config.toml"))
        } else {
            // Fallback to current directory
            Ok(PathBuf::from("provenance-verifier-config.toml"))
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default(&self) -> PipelineResult<VerifierConfig> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = VerifierConfig::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> PipelineResult<VerifierConfig> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            PipelineError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: VerifierConfig = toml::from_str(&content).map_err(|e| {
            PipelineError::ConfigurationError(format!("Failed to parse config file: {e}"))
        })?;

        self.validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &VerifierConfig) -> PipelineResult<()> {
        log::info!("Saving configuration to: {}", self.config_path.display());

        // Ensure parent directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::ConfigurationError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            PipelineError::ConfigurationError(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            PipelineError::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Validate configuration values
    fn validate_config(&self, config: &VerifierConfig) -> PipelineResult<()> {
        if config.tool_bin.trim().is_empty() {
            return Err(PipelineError::ConfigurationError(
                "Tool binary must not be empty".to_string(),
            ));
        }

        if config.tool_timeout_seconds == 0 {
            return Err(PipelineError::ConfigurationError(
                "Tool timeout must be greater than 0".to_string(),
            ));
        }

        if config.fetch.max_bytes == 0 {
            return Err(PipelineError::ConfigurationError(
                "Fetch byte limit must be greater than 0".to_string(),
            ));
        }

        if config.fetch.connect_timeout_seconds == 0 || config.fetch.request_timeout_seconds == 0 {
            return Err(PipelineError::ConfigurationError(
                "Fetch timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_configuration() {
        let config = VerifierConfig::default();
        assert_eq!(config.tool_bin, "c2patool");
        assert!(config.simulator_mode);
        assert_eq!(config.fetch.max_bytes, 15 * 1024 * 1024);
        assert_eq!(config.fetch.max_redirects, 3);
    }

    #[test]
    fn test_config_serialization() {
        let config = VerifierConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: VerifierConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.tool_bin, deserialized.tool_bin);
        assert_eq!(config.tool_timeout_seconds, deserialized.tool_timeout_seconds);
    }

    #[test]
    fn test_config_manager_with_temp_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");
        let manager = ConfigManager::with_path(&config_path);

        // Should create default config
        let config = manager.load_or_create_default().unwrap();
        assert!(config_path.exists());

        // Should be able to load it back
        let loaded_config = manager.load().unwrap();
        assert_eq!(config.tool_bin, loaded_config.tool_bin);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad_config.toml");
        let manager = ConfigManager::with_path(&config_path);

        let mut config = VerifierConfig::default();
        config.tool_timeout_seconds = 0;
        manager.save(&config).unwrap();

        assert!(matches!(
            manager.load(),
            Err(PipelineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_real_tooling_requires_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = VerifierConfig::default();
        config.simulator_mode = false;
        config.sign_cert = temp_dir.path().join("sign.crt");
        config.sign_key = temp_dir.path().join("sign.key");

        // Credential files missing
        assert!(!config.real_tooling_available());

        fs::write(&config.sign_cert, "cert").unwrap();
        fs::write(&config.sign_key, "key").unwrap();
        assert!(config.real_tooling_available());

        // Simulator flag wins over present credentials
        config.simulator_mode = true;
        assert!(!config.real_tooling_available());
    }
}
