//! Dashboard DTOs - Energy overview for a house

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use nilm::domain::{EfficiencyBar, PowerPoint};
use nilm::DashboardOverview;

/// Dashboard response - everything the overview page shows
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub house_id: String,
    pub appliance: String,
    pub overview: DashboardTotals,
    pub recommendations: Vec<String>,
    pub timeline: Vec<TimelinePoint>,
    pub efficiency: Vec<EfficiencyEntry>,
    /// Plain-text summary fed to the assistant (empty when no rows)
    pub context: String,
}

/// Headline numbers
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardTotals {
    pub total_power_kw: f64,
    pub daily_cost: f64,
    pub average_efficiency: f64,
    pub active_devices: usize,
    pub sample_count: usize,
}

impl From<DashboardOverview> for DashboardTotals {
    fn from(overview: DashboardOverview) -> Self {
        Self {
            total_power_kw: overview.total_power_kw,
            daily_cost: overview.daily_cost,
            average_efficiency: overview.average_efficiency,
            active_devices: overview.active_devices,
            sample_count: overview.sample_count,
        }
    }
}

/// One point of the power chart
#[derive(Debug, Serialize, ToSchema)]
pub struct TimelinePoint {
    pub timestamp: DateTime<Utc>,
    pub power_kw: Option<f64>,
    pub appliance: String,
}

impl From<PowerPoint> for TimelinePoint {
    fn from(point: PowerPoint) -> Self {
        Self {
            timestamp: point.timestamp,
            power_kw: point.power_kw,
            appliance: point.appliance,
        }
    }
}

/// Efficiency and savings of one appliance kind
#[derive(Debug, Serialize, ToSchema)]
pub struct EfficiencyEntry {
    pub appliance: String,
    pub label: String,
    pub efficiency: f64,
    pub savings: f64,
}

impl From<EfficiencyBar> for EfficiencyEntry {
    fn from(bar: EfficiencyBar) -> Self {
        Self {
            appliance: bar.appliance.to_string(),
            label: bar.label,
            efficiency: bar.efficiency,
            savings: bar.savings,
        }
    }
}
