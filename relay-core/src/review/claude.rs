//! Claude (Anthropic Messages API) review service
//!
//! Uses the secrecy crate to protect API keys in memory.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

use super::service::{http_client, ReviewService, ServiceSettings};

const SERVICE: &str = "Claude";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Review service backed by the Anthropic Messages API
pub struct ClaudeService {
    api_key: SecretString,
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ClaudeService {
    /// Create a new Claude service
    pub fn new(api_key: SecretString, settings: ServiceSettings) -> Result<Self> {
        let client = http_client(settings.timeout)?;
        Ok(Self {
            api_key,
            settings,
            client,
        })
    }
}

#[async_trait]
impl ReviewService for ClaudeService {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn review(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.settings.model, prompt_chars = prompt.chars().count(), "Calling Claude");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.settings.api_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        extract_text(status, &body)
    }
}

/// Pull the review text out of a Messages API response body
fn extract_text(status: reqwest::StatusCode, body: &str) -> Result<String> {
    let parsed: MessagesResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => {
            return Err(Error::InvalidResponse {
                service: SERVICE,
                reason: format!("parse error: {}", e),
            })
        }
        Err(_) => {
            return Err(Error::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: body.to_string(),
            })
        }
    };

    if let Some(error) = parsed.error {
        return Err(Error::Api {
            service: SERVICE,
            message: error.message,
        });
    }

    if !status.is_success() {
        return Err(Error::Status {
            service: SERVICE,
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    parsed
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| Error::InvalidResponse {
            service: SERVICE,
            reason: "missing content text".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Provider;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> ClaudeService {
        let mut settings = ServiceSettings::defaults(Provider::Claude);
        settings.api_url = server.uri();
        ClaudeService::new(SecretString::new("sk-test".to_string()), settings).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 2048,
            temperature: 0.1,
            messages: vec![Message {
                role: "user",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-sonnet-4-20250514");
        assert_eq!(value["max_tokens"], 2048);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_extract_error_object() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = extract_text(reqwest::StatusCode::from_u16(529).unwrap(), body).unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
        assert!(err.to_string().contains("Overloaded"));
    }

    #[test]
    fn test_extract_missing_content() {
        let err = extract_text(reqwest::StatusCode::OK, r#"{"id":"msg_1"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse { .. }));
    }

    #[test]
    fn test_extract_non_json_error_page() {
        let err = extract_text(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_review_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 2048,
                "messages": [{"role": "user", "content": "review me"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "content": [{"type": "text", "text": "Looks idiomatic."}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = service_for(&server).review("review me").await.unwrap();
        assert_eq!(text, "Looks idiomatic.");
    }

    #[tokio::test]
    async fn test_review_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = service_for(&server).review("p").await.unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[tokio::test]
    async fn test_review_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .mount(&server)
            .await;

        let err = service_for(&server).review("p").await.unwrap_err();
        assert!(err.to_string().contains("invalid x-api-key"));
    }
}
