//! Secrets management for the review relay
//!
//! Secrets are stored separately from configuration to avoid accidental sharing.
//! The secrets file is located at `~/.config/review-relay/secrets.toml` and must
//! have restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (CLAUDE_API_KEY, GEMINI_API_KEY, GITHUB_TOKEN)
//! 2. Secrets file (~/.config/review-relay/secrets.toml)
//!
//! In CI the environment is the normal source; the file exists for local runs.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::review::Provider;
use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// Claude API credentials
    pub claude: ApiKeySecret,
    /// Gemini API credentials
    pub gemini: ApiKeySecret,
    /// GitHub credentials
    pub github: GitHubSecrets,
}

/// A review-service API key
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiKeySecret {
    pub api_key: Option<String>,
}

/// GitHub-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// Token used to post and list PR comments
    pub token: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))
    }

    /// Load secrets from the default location, logging and ignoring a file
    /// that cannot be used
    ///
    /// Environment variables still resolve through the returned value.
    pub fn load_or_default() -> Self {
        match Self::default_secrets_path() {
            Some(path) if path.exists() => Self::load_from_file_or_default(&path),
            _ => Self::default(),
        }
    }

    /// Load secrets from `path`, falling back to empty secrets on any error
    pub fn load_from_file_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(secrets) => secrets,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring secrets file");
                Self::default()
            }
        }
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/review-relay/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("review-relay").join("secrets.toml"))
    }

    /// API key for a review provider
    ///
    /// Priority: provider env var > secrets file
    pub fn api_key(&self, provider: Provider) -> Option<SecretString> {
        let file_value = match provider {
            Provider::Claude => &self.claude.api_key,
            Provider::Gemini => &self.gemini.api_key,
        };
        resolve(provider.api_key_var(), std::env::var(provider.api_key_var()).ok(), file_value)
    }

    /// Get GitHub token with environment variable override
    ///
    /// Priority: GITHUB_TOKEN env var > secrets file
    pub fn github_token(&self) -> Option<SecretString> {
        resolve("GITHUB_TOKEN", std::env::var("GITHUB_TOKEN").ok(), &self.github.token)
    }
}

/// Pick the first non-blank value, trimming whitespace
fn resolve(
    var: &str,
    env_value: Option<String>,
    file_value: &Option<String>,
) -> Option<SecretString> {
    if let Some(value) = env_value {
        let value = value.trim();
        if !value.is_empty() {
            debug!(var, "Using secret from environment");
            return Some(SecretString::new(value.to_string()));
        }
    }

    if let Some(value) = file_value {
        let value = value.trim();
        if !value.is_empty() {
            debug!(var, "Using secret from secrets file");
            return Some(SecretString::new(value.to_string()));
        }
    }

    None
}
