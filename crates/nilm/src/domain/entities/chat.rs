//! Chat transcript entities
//!
//! Storage keeps one combined row per exchange (`ChatRecord`); the
//! transcript shown to the user splits each exchange into two `ChatTurn`s
//! that share an identifier prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::UserScope;

/// Suffix of a user turn rebuilt from a stored record
pub const USER_TURN_SUFFIX: &str = "_user";
/// Suffix of every assistant turn
pub const ASSISTANT_TURN_SUFFIX: &str = "_bot";

/// One display unit of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_user: bool,
}

impl ChatTurn {
    /// A turn authored by the human user
    pub fn user(
        id: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            response: None,
            timestamp,
            is_user: true,
        }
    }

    /// The assistant reply to the user turn with id `prefix`
    pub fn assistant(prefix: &str, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("{prefix}{ASSISTANT_TURN_SUFFIX}"),
            message: message.into(),
            response: None,
            timestamp,
            is_user: false,
        }
    }
}

/// One persisted exchange (prompt and response together)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatRecord {
    /// Create a new record for the given scope
    pub fn new(scope: &UserScope, message: impl Into<String>, response: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: scope.as_str().to_string(),
            message: message.into(),
            response,
            timestamp: Utc::now(),
        }
    }

    /// Split into display turns: the user turn always, the reply only when non-empty
    pub fn to_turns(&self) -> Vec<ChatTurn> {
        let prefix = self.id.to_string();
        let mut turns = vec![ChatTurn::user(
            format!("{prefix}{USER_TURN_SUFFIX}"),
            self.message.clone(),
            self.timestamp,
        )];

        if let Some(response) = self.response.as_deref().filter(|r| !r.is_empty()) {
            turns.push(ChatTurn::assistant(&prefix, response, self.timestamp));
        }

        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_splits_into_two_turns() {
        let scope = UserScope::new("user-1");
        let record = ChatRecord::new(&scope, "hi", Some("hello".to_string()));
        let turns = record.to_turns();

        assert_eq!(turns.len(), 2);
        assert!(turns[0].is_user);
        assert!(!turns[1].is_user);
        assert_eq!(turns[0].id, format!("{}_user", record.id));
        assert_eq!(turns[1].id, format!("{}_bot", record.id));
        assert_eq!(turns[1].message, "hello");
    }

    #[test]
    fn test_empty_response_yields_only_user_turn() {
        let scope = UserScope::new("user-1");
        let missing = ChatRecord::new(&scope, "hi", None);
        let blank = ChatRecord::new(&scope, "hi", Some(String::new()));

        assert_eq!(missing.to_turns().len(), 1);
        assert_eq!(blank.to_turns().len(), 1);
    }
}
