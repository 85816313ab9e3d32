//! NILM API Client
//!
//! Also serves as the CLI's implementation of the domain ports, so a
//! `ChatSession` can run against a remote server.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use nilm::{
    ApplianceRecord, ChatRecord, ChatTranscriptStore, DomainError, GenerationOptions,
    GenerationService, MetricsQuery, MetricsRepository, UserScope,
};

/// API Client for the NILM server
#[derive(Clone)]
pub struct NilmClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Serialize)]
struct CreateChatMessageRequest<'a> {
    message: &'a str,
    response: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiChatRequest<'a> {
    prompt: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiChatResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl NilmClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    /// Send, failing on non-2xx with the server's message
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .context("Failed to connect to NILM API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, error_message(&body));
        }

        Ok(resp)
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Check that the key is accepted by a protected route
    pub async fn verify_key(&self) -> Result<()> {
        self.fetch_metrics(&MetricsQuery::new(1)).await.map(|_| ())
    }

    /// Latest telemetry rows, newest first
    pub async fn fetch_metrics(&self, query: &MetricsQuery) -> Result<Vec<ApplianceRecord>> {
        let mut request = self
            .client
            .get(self.url(&format!("/nilm/houses/{}/metrics", query.house_id)));
        if let Some(kind) = query.appliance {
            request = request.query(&[("appliance", kind.as_str())]);
        }

        let rows: Vec<ApplianceRecord> = self
            .execute(request)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(rows)
    }

    /// A user's exchanges, oldest first
    pub async fn list_chat_messages(&self, user_id: &str, limit: i64) -> Result<Vec<ChatRecord>> {
        let request = self
            .client
            .get(self.url(&format!("/nilm/users/{}/chat-messages", user_id)))
            .query(&[("limit", limit)]);

        let records: Vec<ChatRecord> = self
            .execute(request)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(records)
    }

    /// Persist one exchange
    pub async fn create_chat_message(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
    ) -> Result<ChatRecord> {
        let request = self
            .client
            .post(self.url(&format!("/nilm/users/{}/chat-messages", user_id)))
            .json(&CreateChatMessageRequest { message, response });

        let record: ChatRecord = self
            .execute(request)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(record)
    }

    /// Run a fully composed prompt through the server's Gemini relay
    pub async fn gemini_chat(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = self
            .client
            .post(self.url("/nilm/gemini-chat"))
            .json(&GeminiChatRequest {
                prompt,
                temperature,
            });

        let reply: GeminiChatResponse = self
            .execute(request)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(reply.response)
    }
}

/// `{"error": "..."}` bodies collapse to their message
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}

fn external(e: anyhow::Error) -> DomainError {
    DomainError::ExternalService(format!("{:#}", e))
}

// ============================================
// Port implementations
// ============================================

#[async_trait]
impl MetricsRepository for NilmClient {
    async fn fetch(&self, query: &MetricsQuery) -> Result<Vec<ApplianceRecord>, DomainError> {
        self.fetch_metrics(query)
            .await
            .map_err(|e| DomainError::Repository(format!("{:#}", e)))
    }
}

#[async_trait]
impl ChatTranscriptStore for NilmClient {
    async fn append(
        &self,
        scope: &UserScope,
        message: &str,
        response: &str,
    ) -> Result<ChatRecord, DomainError> {
        self.create_chat_message(scope.as_str(), message, response)
            .await
            .map_err(|e| DomainError::Repository(format!("{:#}", e)))
    }

    async fn list(&self, scope: &UserScope, limit: i64) -> Result<Vec<ChatRecord>, DomainError> {
        self.list_chat_messages(scope.as_str(), limit)
            .await
            .map_err(|e| DomainError::Repository(format!("{:#}", e)))
    }
}

#[async_trait]
impl GenerationService for NilmClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, DomainError> {
        self.gemini_chat(prompt, options.temperature)
            .await
            .map_err(external)
    }

    fn provider_name(&self) -> &str {
        "relay"
    }

    fn model_id(&self) -> &str {
        "gemini"
    }
}
