//! NILM Data Models
//!
//! - Metrics: appliance telemetry rows
//! - Dashboard: aggregated overview for one house
//! - Chat: transcript records and the Gemini relay

mod chat;
mod dashboard;
mod metrics;

pub use chat::*;
pub use dashboard::*;
pub use metrics::*;
