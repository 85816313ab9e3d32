//! PostgreSQL implementation of ChatTranscriptStore

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nilm::{ChatRecord, ChatTranscriptStore, DomainError, UserScope};

/// PostgreSQL implementation of ChatTranscriptStore
pub struct PgChatTranscriptStore {
    pool: PgPool,
}

impl PgChatTranscriptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChatMessageRow {
    id: Uuid,
    user_id: String,
    message: String,
    response: Option<String>,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<ChatMessageRow> for ChatRecord {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            message: row.message,
            response: row.response,
            timestamp: row.timestamp,
        }
    }
}

#[async_trait]
impl ChatTranscriptStore for PgChatTranscriptStore {
    async fn append(
        &self,
        scope: &UserScope,
        message: &str,
        response: &str,
    ) -> Result<ChatRecord, DomainError> {
        let row = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            INSERT INTO chat_messages (user_id, message, response)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(scope.as_str())
        .bind(message)
        .bind(response)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn list(&self, scope: &UserScope, limit: i64) -> Result<Vec<ChatRecord>, DomainError> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT * FROM (
                SELECT * FROM chat_messages
                WHERE user_id = $1
                ORDER BY timestamp DESC
                LIMIT $2
            ) recent
            ORDER BY timestamp ASC
            "#,
        )
        .bind(scope.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
