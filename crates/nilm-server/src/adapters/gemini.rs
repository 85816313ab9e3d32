//! Gemini `generateContent` adapter for GenerationService.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use nilm::{DomainError, GenerationOptions, GenerationService};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Generation backend calling Google's Gemini API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Creates a new generator using the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the Gemini model name if needed.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate text. An answer without candidate text yields an empty string.
    pub async fn generate_content(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig::from(options),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| GeminiError::RequestFailed(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| GeminiError::ParseError(err.to_string()))?;

        Ok(extract_text(&payload).unwrap_or_default())
    }
}

#[async_trait]
impl GenerationService for GeminiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, DomainError> {
        self.generate_content(prompt, options).await.map_err(|e| {
            tracing::error!(model = %self.model, "Gemini call failed: {}", e);
            DomainError::ExternalService(e.upstream_message())
        })
    }

    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Request Types
// ============================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl From<&GenerationOptions> for GenerationConfig {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_k: options.top_k,
            top_p: options.top_p,
            max_output_tokens: options.max_output_tokens,
        }
    }
}

// ============================================
// Errors
// ============================================

/// Gemini error types
#[derive(Debug, Clone, Error)]
pub enum GeminiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },
}

impl GeminiError {
    /// The message worth showing a caller, without our own prefixes
    pub fn upstream_message(&self) -> String {
        match self {
            GeminiError::ApiError { message, .. } | GeminiError::RateLimited { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

// ============================================
// Helper Functions
// ============================================

/// Text of the first part of the first candidate
fn extract_text(root: &Value) -> Option<String> {
    root.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn map_http_error(status: StatusCode, body: String) -> GeminiError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or_else(|| "Failed to generate response".to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        return GeminiError::RateLimited { message };
    }

    GeminiError::ApiError {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_takes_first_part() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other candidate" }] } }
            ]
        });

        assert_eq!(extract_text(&payload).as_deref(), Some("first"));
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(
            extract_text(&json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] })),
            None
        );
    }

    #[test]
    fn test_map_http_error_prefers_upstream_message() {
        let body = json!({ "error": { "code": 400, "message": "API key not valid" } }).to_string();
        let err = map_http_error(StatusCode::BAD_REQUEST, body);

        assert!(matches!(err, GeminiError::ApiError { status: 400, .. }));
        assert_eq!(err.upstream_message(), "API key not valid");
    }

    #[test]
    fn test_map_http_error_without_json_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>".to_string());
        assert_eq!(err.upstream_message(), "Failed to generate response");

        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(err, GeminiError::RateLimited { .. }));
    }

    #[test]
    fn test_generation_config_uses_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig::from(&GenerationOptions::default()),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 500);
        assert!(value["generationConfig"]["temperature"].is_number());
    }
}
