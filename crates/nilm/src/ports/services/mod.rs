//! Service Ports
//!
//! Abstract interfaces for external services.

mod generation;

pub use generation::*;
