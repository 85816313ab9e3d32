//! PostgreSQL Repository Implementations

mod metrics_repository;
mod transcript_repository;

pub use metrics_repository::PgMetricsRepository;
pub use transcript_repository::PgChatTranscriptStore;
