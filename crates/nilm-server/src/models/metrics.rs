//! Appliance telemetry DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use nilm::ApplianceRecord;

/// One telemetry sample
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplianceMetric {
    pub id: String,
    pub house_id: i32,
    pub appliance_name: String,
    pub current_power_kw: Option<f64>,
    pub total_energy_kwh_day: Option<f64>,
    pub peak_energy_kwh: Option<f64>,
    pub longest_on_duration_hrs: Option<f64>,
    pub efficiency_percentage: Option<f64>,
    pub potential_savings_year: Option<f64>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ApplianceRecord> for ApplianceMetric {
    fn from(record: ApplianceRecord) -> Self {
        Self {
            id: record.id,
            house_id: record.house_id,
            appliance_name: record.appliance_name,
            current_power_kw: record.current_power_kw,
            total_energy_kwh_day: record.total_energy_kwh_day,
            peak_energy_kwh: record.peak_energy_kwh,
            longest_on_duration_hrs: record.longest_on_duration_hrs,
            efficiency_percentage: record.efficiency_percentage,
            potential_savings_year: record.potential_savings_year,
            status: record.status,
            timestamp: record.timestamp,
        }
    }
}

/// Appliance filter (`all` or one appliance name)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplianceFilter {
    pub appliance: Option<String>,
}
