//! Chat Transcript Routes
//!
//! One row per exchange, scoped by user.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use nilm::ports::DEFAULT_HISTORY_LIMIT;
use nilm::UserScope;

use crate::models::{ChatMessageResponse, CreateChatMessageRequest, HistoryParams};
use crate::routes::domain_error;
use crate::AppState;

const MAX_HISTORY_LIMIT: i64 = 500;

/// List a user's most recent exchanges, oldest first
#[utoipa::path(
    get,
    path = "/nilm/users/{user_id}/chat-messages",
    params(
        ("user_id" = String, Path, description = "User identifier"),
        HistoryParams
    ),
    responses(
        (
            status = 200,
            description = "Exchanges in ascending time order",
            body = Vec<ChatMessageResponse>
        ),
        (status = 500, description = "Internal server error")
    ),
    tag = "Chat"
)]
pub async fn list_chat_messages(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ChatMessageResponse>>, (StatusCode, String)> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let records = state
        .transcripts
        .list(&UserScope::new(user_id), limit)
        .await
        .map_err(domain_error)?;

    Ok(Json(records.into_iter().map(ChatMessageResponse::from).collect()))
}

/// Persist one exchange
#[utoipa::path(
    post,
    path = "/nilm/users/{user_id}/chat-messages",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = CreateChatMessageRequest,
    responses(
        (status = 200, description = "Exchange stored", body = ChatMessageResponse),
        (status = 400, description = "Empty message"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Chat"
)]
pub async fn create_chat_message(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CreateChatMessageRequest>,
) -> Result<Json<ChatMessageResponse>, (StatusCode, String)> {
    if payload.message.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message is required".to_string()));
    }

    let scope = UserScope::new(user_id);
    let record = state
        .transcripts
        .append(&scope, &payload.message, &payload.response)
        .await
        .map_err(domain_error)?;

    tracing::info!("Stored chat exchange {} for {}", record.id, scope);

    Ok(Json(record.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/nilm/users/:user_id/chat-messages",
        get(list_chat_messages).post(create_chat_message),
    )
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, post_json, send, test_app};
    use serde_json::json;

    #[tokio::test]
    async fn test_store_then_list() {
        let app = test_app(Vec::new(), None, None);

        for (message, response) in [("q1", "a1"), ("q2", "a2")] {
            let (status, body) = send(
                &app.router,
                post_json(
                    "/nilm/users/alice/chat-messages",
                    json!({ "message": message, "response": response }),
                ),
            )
            .await;
            assert_eq!(status, 200);
            assert_eq!(body["user_id"], "alice");
        }
        send(
            &app.router,
            post_json(
                "/nilm/users/bob/chat-messages",
                json!({ "message": "other", "response": "user" }),
            ),
        )
        .await;

        let (status, body) = send(&app.router, get("/nilm/users/alice/chat-messages")).await;

        assert_eq!(status, 200);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["message"], "q1");
        assert_eq!(list[1]["response"], "a2");
    }

    #[tokio::test]
    async fn test_limit_is_applied() {
        let app = test_app(Vec::new(), None, None);
        for i in 0..3 {
            send(
                &app.router,
                post_json(
                    "/nilm/users/alice/chat-messages",
                    json!({ "message": format!("q{i}"), "response": "a" }),
                ),
            )
            .await;
        }

        let (_, body) = send(&app.router, get("/nilm/users/alice/chat-messages?limit=2")).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["message"], "q1");
        assert_eq!(list[1]["message"], "q2");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let app = test_app(Vec::new(), None, None);

        let (status, _) = send(
            &app.router,
            post_json(
                "/nilm/users/alice/chat-messages",
                json!({ "message": "  ", "response": "a" }),
            ),
        )
        .await;

        assert_eq!(status, 400);
        assert!(app.transcripts.records.lock().unwrap().is_empty());
    }
}
