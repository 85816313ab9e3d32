//! NILM API Routes
//!
//! - /nilm/houses/:house_id/metrics - Raw telemetry rows
//! - /nilm/houses/:house_id/dashboard - Aggregated overview
//! - /nilm/users/:user_id/chat-messages - Chat transcript
//! - /nilm/gemini-chat - Generation relay (Gemini)

use axum::http::StatusCode;
use nilm::DomainError;

pub mod chat;
pub mod dashboard;
pub mod metrics;
pub mod relay;
pub mod swagger;

/// Map a domain error onto an HTTP status
pub(crate) fn domain_error(e: DomainError) -> (StatusCode, String) {
    let status = match &e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Repository(_) | DomainError::ExternalService(_) => {
            tracing::error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}
