//! Domain Errors
//!
//! Error types for domain operations and chat round-trips.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

/// Failure of a single chat operation.
///
/// None of these are fatal: the session returns to idle and stays usable.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The generation endpoint failed, timed out, or answered with garbage.
    #[error("Generation failed: {0}")]
    UpstreamGeneration(#[source] DomainError),

    /// The response was generated but could not be written to the transcript store.
    #[error("Failed to persist chat exchange: {0}")]
    Persistence(#[source] DomainError),

    /// Reading history failed; the transcript is left as it was.
    #[error("Failed to load chat history: {0}")]
    HistoryLoad(#[source] DomainError),
}
