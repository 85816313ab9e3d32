//! NILM Domain Library
//!
//! Core domain types and interfaces for the NILM (Non-Intrusive Load
//! Monitoring) energy dashboard and its chat assistant.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (ApplianceRecord, ChatTurn, ChatRecord)
//!   - `value_objects/`: Immutable value types (ApplianceKind, StatusClass, UserScope)
//!   - `services/`: Pure computations (context summary, dashboard overview, prompt)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Metrics and chat transcript access
//!   - `services/`: Text generation
//!
//! - **Application** (`application/`): The chat session state machine
//!
//! # Usage
//!
//! ```rust,ignore
//! use nilm::{ChatSession, ChatSessionConfig, UserScope};
//!
//! let session = ChatSession::new(generator, transcripts, ChatSessionConfig::default());
//! session.set_user_scope(Some(UserScope::new("user-1"))).await;
//! session.update_dashboard(rows, "1").await;
//! let outcome = session.send("Why is my fridge so hungry?").await;
//! ```

pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use application::{
    ChatSession, ChatSessionConfig, HistoryOutcome, Notice, SendOutcome, SessionPhase, SkipReason,
};
pub use domain::{
    summarize, ApplianceKind, ApplianceRecord, ChatError, ChatRecord, ChatTurn, DashboardContext,
    DashboardOverview, DomainError, StatusClass, UserScope,
};
pub use ports::{
    // Repositories
    ChatTranscriptStore,
    MetricsRepository,
    MetricsQuery,
    // Services
    GenerationOptions,
    GenerationService,
};
