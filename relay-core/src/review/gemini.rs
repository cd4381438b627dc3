//! Gemini (Google Generative Language API) review service
//!
//! The model is embedded in the URL path and the key travels in the
//! `x-goog-api-key` header. Transport errors are stripped of their URL
//! before they reach the log.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

use super::service::{http_client, ReviewService, ServiceSettings};

const SERVICE: &str = "Gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Review service backed by the Gemini `generateContent` endpoint
pub struct GeminiService {
    api_key: SecretString,
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl GeminiService {
    /// Create a new Gemini service
    pub fn new(api_key: SecretString, settings: ServiceSettings) -> Result<Self> {
        let client = http_client(settings.timeout)?;
        Ok(Self {
            api_key,
            settings,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_url, self.settings.model
        )
    }
}

#[async_trait]
impl ReviewService for GeminiService {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn review(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_tokens,
            },
        };

        debug!(model = %self.settings.model, prompt_chars = prompt.chars().count(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret().as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        extract_text(status, &body)
    }
}

/// Pull the review text out of a `generateContent` response body
fn extract_text(status: reqwest::StatusCode, body: &str) -> Result<String> {
    let parsed: GenerateResponse = match serde_json::from_str(body) {
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
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| Error::InvalidResponse {
            service: SERVICE,
            reason: "missing candidate text".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Provider;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> GeminiService {
        let mut settings = ServiceSettings::defaults(Provider::Gemini);
        settings.api_url = server.uri();
        GeminiService::new(SecretString::new("AIza-test".to_string()), settings).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 2048,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_extract_blocked_candidate_without_content() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let err = extract_text(reqwest::StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse { .. }));
    }

    #[test]
    fn test_extract_no_candidates() {
        let err = extract_text(reqwest::StatusCode::OK, r#"{"promptFeedback":{}}"#).unwrap_err();
        assert!(err.to_string().contains("missing candidate text"));
    }

    #[tokio::test]
    async fn test_review_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash-latest:generateContent"))
            .and(header("x-goog-api-key", "AIza-test"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "review me"}]}],
                "generationConfig": {"maxOutputTokens": 2048}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Use errors.Is."}], "role": "model"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = service_for(&server).review("review me").await.unwrap();
        assert_eq!(text, "Use errors.Is.");
    }

    #[tokio::test]
    async fn test_review_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let err = service_for(&server).review("p").await.unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_review_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = service_for(&server).review("p").await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_key_stays_out_of_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .mount(&server)
            .await;

        service_for(&server).review("p").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_none());
        assert!(!requests[0].url.as_str().contains("AIza-test"));
    }

    #[tokio::test]
    async fn test_transport_error_hides_key() {
        let mut settings = ServiceSettings::defaults(Provider::Gemini);
        settings.api_url = "http://127.0.0.1:1".to_string();
        let service =
            GeminiService::new(SecretString::new("AIza-SECRET".to_string()), settings).unwrap();

        let err = service.review("p").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("AIza-SECRET"));
        assert!(!format!("{:?}", err).contains("AIza-SECRET"));
        assert!(!err.to_string().contains("generateContent"));
    }
}
