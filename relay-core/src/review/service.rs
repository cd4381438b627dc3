//! Review service abstraction

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::config::ServiceConfig;
use crate::{Error, Result};

use super::provider::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use super::{ClaudeService, GeminiService, Provider};

/// Trait for external code review services
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Get the name of this service
    fn name(&self) -> &'static str;

    /// Send a prompt and return the review text
    ///
    /// Returns an error for transport failures, non-success statuses, error
    /// objects and responses without a text field. The text itself may still
    /// be blank; callers decide what a usable review is.
    async fn review(&self, prompt: &str) -> Result<String>;
}

/// Fully resolved settings for one review service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub char_budget: usize,
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub preamble: Option<String>,
}

impl ServiceSettings {
    /// Fill unset config fields with the provider's defaults
    pub fn resolve(provider: Provider, config: &ServiceConfig) -> Self {
        Self {
            model: config
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            char_budget: config
                .char_budget
                .unwrap_or_else(|| provider.default_char_budget()),
            api_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| provider.default_api_url().to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: config.timeout,
            preamble: config.preamble.clone(),
        }
    }

    /// Defaults for a provider
    pub fn defaults(provider: Provider) -> Self {
        Self::resolve(provider, &ServiceConfig::default())
    }
}

/// Build the HTTP client shared by a service's requests
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        "review-relay/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(Error::Http)
}

/// Construct the review service for `provider`
pub fn build_service(
    provider: Provider,
    api_key: SecretString,
    settings: &ServiceSettings,
) -> Result<Box<dyn ReviewService>> {
    Ok(match provider {
        Provider::Claude => Box::new(ClaudeService::new(api_key, settings.clone())?),
        Provider::Gemini => Box::new(GeminiService::new(api_key, settings.clone())?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let claude = ServiceSettings::defaults(Provider::Claude);
        assert_eq!(claude.model, "claude-sonnet-4-20250514");
        assert_eq!(claude.max_tokens, 2048);
        assert_eq!(claude.temperature, 0.1);
        assert_eq!(claude.char_budget, 22_000);
        assert!(claude.timeout.is_none());

        let gemini = ServiceSettings::defaults(Provider::Gemini);
        assert_eq!(gemini.model, "gemini-1.5-flash-latest");
        assert_eq!(gemini.char_budget, 18_000);
    }

    #[test]
    fn test_resolve_overrides() {
        let config = ServiceConfig {
            model: Some("custom".to_string()),
            char_budget: Some(1000),
            api_url: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };
        let settings = ServiceSettings::resolve(Provider::Gemini, &config);
        assert_eq!(settings.model, "custom");
        assert_eq!(settings.char_budget, 1000);
        assert_eq!(settings.api_url, "http://localhost:8080");
        assert_eq!(settings.max_tokens, 2048);
    }

    #[test]
    fn test_build_service_names() {
        let key = SecretString::new("k".to_string());
        for provider in Provider::ALL {
            let service =
                build_service(provider, key.clone(), &ServiceSettings::defaults(provider)).unwrap();
            assert_eq!(service.name(), provider.name());
        }
    }
}
