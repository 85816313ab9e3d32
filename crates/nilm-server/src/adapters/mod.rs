//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod gemini;
pub mod postgres;

// Re-exports
pub use gemini::{GeminiError, GeminiGenerator};
pub use postgres::{PgChatTranscriptStore, PgMetricsRepository};
