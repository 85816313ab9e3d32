//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (repositories, services).
//!
//! Implementations of these traits live in the infrastructure layer
//! (`nilm-server` for PostgreSQL and Gemini, `nilm-cli` for HTTP).

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
