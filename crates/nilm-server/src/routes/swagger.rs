//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Metrics models
    ApplianceMetric,
    // Dashboard models
    DashboardResponse, DashboardTotals, EfficiencyEntry, TimelinePoint,
    // Chat models
    ChatMessageResponse, CreateChatMessageRequest, ErrorResponse, GeminiChatRequest,
    GeminiChatResponse,
};
use crate::routes::{chat, dashboard, metrics, relay};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NILM API",
        version = "0.1.0",
        description = "Non-Intrusive Load Monitoring dashboard API\n\nAppliance telemetry, dashboard aggregates and the energy assistant chat.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    paths(
        metrics::list_metrics,
        dashboard::get_dashboard,
        chat::list_chat_messages,
        chat::create_chat_message,
        relay::gemini_chat,
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Metrics", description = "Metrics - Appliance telemetry rows"),
        (name = "Dashboard", description = "Dashboard - Aggregated house overview"),
        (name = "Chat", description = "Chat - Transcript storage and Gemini relay"),
    ),
    components(
        schemas(
            // Metrics
            ApplianceMetric,
            // Dashboard
            DashboardResponse,
            DashboardTotals,
            TimelinePoint,
            EfficiencyEntry,
            // Chat
            ChatMessageResponse,
            CreateChatMessageRequest,
            GeminiChatRequest,
            GeminiChatResponse,
            ErrorResponse,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/nilm/houses/{house_id}/metrics",
            "/nilm/houses/{house_id}/dashboard",
            "/nilm/users/{user_id}/chat-messages",
            "/nilm/gemini-chat",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }
}
