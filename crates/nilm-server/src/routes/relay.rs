//! Gemini Relay Route
//!
//! Lets clients without a Gemini key reach the model through the server.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use nilm::domain::compose_prompt;
use nilm::{DomainError, GenerationOptions};

use crate::models::{ErrorResponse, GeminiChatRequest, GeminiChatResponse};
use crate::AppState;

/// Returned when the model produced no text
pub const FALLBACK_RESPONSE: &str = "Sorry, I could not generate a response.";

type RelayError = (StatusCode, Json<ErrorResponse>);

fn relay_error(status: StatusCode, message: impl Into<String>) -> RelayError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Generate an assistant reply
#[utoipa::path(
    post,
    path = "/nilm/gemini-chat",
    request_body = GeminiChatRequest,
    responses(
        (status = 200, description = "Generated reply", body = GeminiChatResponse),
        (status = 400, description = "No prompt or message", body = ErrorResponse),
        (status = 500, description = "Generation failed or not configured", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn gemini_chat(
    State(state): State<AppState>,
    Json(payload): Json<GeminiChatRequest>,
) -> Result<Json<GeminiChatResponse>, RelayError> {
    let Some(generator) = state.generator.as_ref() else {
        return Err(relay_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GEMINI_API_KEY not configured",
        ));
    };

    let prompt = match (payload.prompt.as_deref(), payload.message.as_deref()) {
        (Some(prompt), _) if !prompt.trim().is_empty() => prompt.to_string(),
        (_, Some(message)) if !message.trim().is_empty() => compose_prompt(
            payload.dashboard_context.as_deref().unwrap_or_default(),
            message.trim(),
        ),
        _ => {
            return Err(relay_error(StatusCode::BAD_REQUEST, "Message is required"));
        }
    };

    let temperature = payload
        .temperature
        .unwrap_or(nilm::ports::DEFAULT_TEMPERATURE);
    let options = GenerationOptions::with_temperature(temperature);

    let text = generator.generate(&prompt, &options).await.map_err(|e| {
        tracing::error!("Error in gemini-chat relay: {}", e);
        let message = match e {
            DomainError::ExternalService(message) => message,
            other => other.to_string(),
        };
        relay_error(StatusCode::INTERNAL_SERVER_ERROR, message)
    })?;

    let response = if text.trim().is_empty() {
        FALLBACK_RESPONSE.to_string()
    } else {
        text
    };

    Ok(Json(GeminiChatResponse { response }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/nilm/gemini-chat", post(gemini_chat))
}

#[cfg(test)]
mod tests {
    use super::FALLBACK_RESPONSE;
    use crate::test_support::{post_json, send, test_app, StubGenerator};
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_message_is_wrapped_in_persona() {
        let generator = Arc::new(StubGenerator::replying("Run it at night."));
        let app = test_app(Vec::new(), Some(generator.clone()), None);

        let (status, body) = send(
            &app.router,
            post_json(
                "/nilm/gemini-chat",
                json!({
                    "message": "When should I run the dishwasher?",
                    "dashboardContext": "CTX"
                }),
            ),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["response"], "Run it at night.");

        let calls = generator.calls.lock().unwrap().clone();
        let (prompt, options) = &calls[0];
        assert!(prompt.starts_with("You are an energy efficiency expert assistant"));
        assert!(prompt.contains("Current Dashboard Data: CTX"));
        assert!(prompt.ends_with("User message: When should I run the dishwasher?"));
        assert_eq!(options.top_k, Some(40));
        assert_eq!(options.max_output_tokens, Some(500));
    }

    #[tokio::test]
    async fn test_prompt_is_forwarded_verbatim() {
        let generator = Arc::new(StubGenerator::replying("ok"));
        let app = test_app(Vec::new(), Some(generator.clone()), None);

        send(
            &app.router,
            post_json(
                "/nilm/gemini-chat",
                json!({ "prompt": "RAW PROMPT", "temperature": 0.3 }),
            ),
        )
        .await;

        let calls = generator.calls.lock().unwrap().clone();
        assert_eq!(calls[0].0, "RAW PROMPT");
        assert_eq!(calls[0].1.temperature, 0.3);
    }

    #[tokio::test]
    async fn test_empty_generation_uses_fallback() {
        let app = test_app(Vec::new(), Some(Arc::new(StubGenerator::replying(""))), None);

        let (status, body) =
            send(&app.router, post_json("/nilm/gemini-chat", json!({ "message": "hi" }))).await;

        assert_eq!(status, 200);
        assert_eq!(body["response"], FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_returned() {
        let generator = Arc::new(StubGenerator::failing("API key not valid"));
        let app = test_app(Vec::new(), Some(generator), None);

        let (status, body) =
            send(&app.router, post_json("/nilm/gemini-chat", json!({ "message": "hi" }))).await;

        assert_eq!(status, 500);
        assert_eq!(body["error"], "API key not valid");
    }

    #[tokio::test]
    async fn test_missing_key_and_missing_message() {
        let app = test_app(Vec::new(), None, None);
        let (status, body) =
            send(&app.router, post_json("/nilm/gemini-chat", json!({ "message": "hi" }))).await;
        assert_eq!(status, 500);
        assert_eq!(body["error"], "GEMINI_API_KEY not configured");

        let app = test_app(Vec::new(), Some(Arc::new(StubGenerator::replying("x"))), None);
        let (status, body) =
            send(&app.router, post_json("/nilm/gemini-chat", json!({ "message": "  " }))).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Message is required");
    }

    #[tokio::test]
    async fn test_protected_by_api_key() {
        let app = test_app(
            Vec::new(),
            Some(Arc::new(StubGenerator::replying("x"))),
            Some("secret"),
        );

        let (status, _) =
            send(&app.router, post_json("/nilm/gemini-chat", json!({ "message": "hi" }))).await;
        assert_eq!(status, 401);

        let request = Request::post("/nilm/gemini-chat")
            .header("content-type", "application/json")
            .header("apikey", "secret")
            .body(Body::from(json!({ "message": "hi" }).to_string()))
            .unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, 200);

        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
    }
}
