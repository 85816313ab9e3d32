//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod dashboard_service;

pub use dashboard_service::{DashboardService, DashboardSnapshot};
