//! Chat DTOs - Transcript records and the Gemini relay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use nilm::ChatRecord;

/// One persisted exchange
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageResponse {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatRecord> for ChatMessageResponse {
    fn from(record: ChatRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            message: record.message,
            response: record.response,
            timestamp: record.timestamp,
        }
    }
}

/// Persist one exchange
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateChatMessageRequest {
    pub message: String,
    pub response: String,
}

/// History paging
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum records (default 50)
    pub limit: Option<i64>,
}

/// Gemini relay request.
///
/// Either `prompt` (sent as-is) or `message` with an optional
/// `dashboardContext` (wrapped in the assistant persona).
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeminiChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Gemini relay response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeminiChatResponse {
    pub response: String,
}

/// Error body of the relay
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
