//! Repository Ports
//!
//! Abstract interfaces for data access operations.

mod metrics_repository;
mod transcript_repository;

pub use metrics_repository::*;
pub use transcript_repository::*;
