//! Configuration management for the review relay
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (REVIEW_RELAY_*)
//! 3. Config file (~/.config/review-relay/config.toml)
//! 4. Built-in per-provider defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::review::Provider;
use crate::{Error, Result};

/// Per-service overrides
///
/// Every field is optional; unset fields fall back to the provider default
/// when resolved into [`crate::review::ServiceSettings`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Model identifier
    pub model: Option<String>,

    /// Output token limit
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Maximum prompt length in characters
    pub char_budget: Option<usize>,

    /// API origin, e.g. `https://api.anthropic.com`
    pub api_url: Option<String>,

    /// Request timeout; no deadline when unset
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Replacement for the built-in review preamble
    pub preamble: Option<String>,
}

/// GitHub-related configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL for GitHub Enterprise; github.com when unset
    pub api_url: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Claude relay settings
    pub claude: ServiceConfig,

    /// Gemini relay settings
    pub gemini: ServiceConfig,

    /// Comment API settings
    pub github: GitHubConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/review-relay/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("review-relay").join("config.toml"))
    }

    /// Settings for one provider
    pub fn service(&self, provider: Provider) -> &ServiceConfig {
        match provider {
            Provider::Claude => &self.claude,
            Provider::Gemini => &self.gemini,
        }
    }

    fn service_mut(&mut self, provider: Provider) -> &mut ServiceConfig {
        match provider {
            Provider::Claude => &mut self.claude,
            Provider::Gemini => &mut self.gemini,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - REVIEW_RELAY_CLAUDE_MODEL: Claude model identifier
    /// - REVIEW_RELAY_GEMINI_MODEL: Gemini model identifier
    /// - REVIEW_RELAY_GITHUB_API_URL: GitHub API base URL
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("REVIEW_RELAY_CLAUDE_MODEL") {
            self.claude.model = Some(model);
        }

        if let Ok(model) = std::env::var("REVIEW_RELAY_GEMINI_MODEL") {
            self.gemini.model = Some(model);
        }

        if let Ok(url) = std::env::var("REVIEW_RELAY_GITHUB_API_URL") {
            self.github.api_url = Some(url);
        }

        self
    }

    /// Apply CLI flag overrides for one provider
    pub fn with_cli_overrides(mut self, provider: Provider, model: Option<String>) -> Self {
        if let Some(m) = model {
            self.service_mut(provider).model = Some(m);
        }

        self
    }

    /// Load configuration from `path` (or the default location) with env
    /// overrides applied
    pub fn load_with_overrides(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };
        Ok(config.with_env_overrides())
    }

    /// Like [`Config::load_with_overrides`], but an unreadable or malformed
    /// file is logged and replaced by defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load_with_overrides(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Ignoring config file, using defaults");
                Self::default().with_env_overrides()
            }
        }
    }
}
