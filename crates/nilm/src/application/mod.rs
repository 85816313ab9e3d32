//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod chat_session;

pub use chat_session::{
    ChatSession, ChatSessionConfig, HistoryOutcome, Notice, SendOutcome, SessionPhase, SkipReason,
};
