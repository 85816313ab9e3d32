//! Chat Transcript Store Port
//!
//! Durable per-user log of prompt/response exchanges.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ChatRecord, UserScope};

/// Records returned by a history load
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Repository interface for chat exchanges
#[async_trait]
pub trait ChatTranscriptStore: Send + Sync {
    /// Persist one exchange (prompt and response together)
    async fn append(
        &self,
        scope: &UserScope,
        message: &str,
        response: &str,
    ) -> Result<ChatRecord, DomainError>;

    /// The `limit` most recent records of `scope`, returned oldest first
    async fn list(&self, scope: &UserScope, limit: i64) -> Result<Vec<ChatRecord>, DomainError>;
}
