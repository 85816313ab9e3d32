//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - ApplianceRecord: One telemetry sample for one appliance in one house
//! - ChatTurn: One display unit of the chat transcript
//! - ChatRecord: One persisted prompt/response exchange

mod appliance;
mod chat;

pub use appliance::*;
pub use chat::*;
