//! ApplianceRecord - Appliance telemetry sample
//!
//! Nothing is validated here. Every numeric reading may be absent and every
//! string may fall outside the known vocabulary; consumers decide how to
//! treat the gaps (aggregations count a missing reading as zero).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ApplianceKind, StatusClass};

/// One telemetry sample for a single appliance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub house_id: i32,
    #[serde(default)]
    pub appliance_name: String,
    /// Current draw in kW
    pub current_power_kw: Option<f64>,
    /// Energy used so far today in kWh
    pub total_energy_kwh_day: Option<f64>,
    pub peak_energy_kwh: Option<f64>,
    /// Longest continuous on-period in hours
    pub longest_on_duration_hrs: Option<f64>,
    /// Efficiency in percent, nominally 0-100
    pub efficiency_percentage: Option<f64>,
    /// Estimated savings per year in currency units
    pub potential_savings_year: Option<f64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

impl ApplianceRecord {
    /// Create a sample with no readings
    pub fn new(
        id: impl Into<String>,
        house_id: i32,
        appliance_name: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            house_id,
            appliance_name: appliance_name.into(),
            status: status.into(),
            timestamp: Utc::now(),
            ..Default::default()
        }
    }

    pub fn with_power(mut self, kw: f64) -> Self {
        self.current_power_kw = Some(kw);
        self
    }

    pub fn with_daily_energy(mut self, kwh: f64) -> Self {
        self.total_energy_kwh_day = Some(kwh);
        self
    }

    pub fn with_longest_on(mut self, hours: f64) -> Self {
        self.longest_on_duration_hrs = Some(hours);
        self
    }

    pub fn with_efficiency(mut self, percent: f64) -> Self {
        self.efficiency_percentage = Some(percent);
        self
    }

    pub fn with_savings(mut self, per_year: f64) -> Self {
        self.potential_savings_year = Some(per_year);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Known appliance kind, if the name is part of the fixed vocabulary
    pub fn kind(&self) -> Option<ApplianceKind> {
        self.appliance_name.parse().ok()
    }

    /// Display classification of the status (case-insensitive)
    pub fn status_class(&self) -> StatusClass {
        StatusClass::classify(&self.status)
    }

    /// Exact, case-sensitive check used by every "active devices" count
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn power_or_zero(&self) -> f64 {
        self.current_power_kw.unwrap_or(0.0)
    }

    pub fn daily_energy_or_zero(&self) -> f64 {
        self.total_energy_kwh_day.unwrap_or(0.0)
    }

    pub fn efficiency_or_zero(&self) -> f64 {
        self.efficiency_percentage.unwrap_or(0.0)
    }

    pub fn savings_or_zero(&self) -> f64 {
        self.potential_savings_year.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_absent() {
        let record: ApplianceRecord = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "house_id": 2,
            "appliance_name": "microwave",
            "status": "standby",
            "timestamp": "2024-03-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.house_id, 2);
        assert_eq!(record.kind(), Some(ApplianceKind::Microwave));
        assert!(record.current_power_kw.is_none());
        assert_eq!(record.power_or_zero(), 0.0);
        assert_eq!(record.status_class(), StatusClass::Standby);
    }

    #[test]
    fn test_is_active_is_case_sensitive() {
        let lower = ApplianceRecord::new("a", 1, "refrigerator", "active");
        let title = ApplianceRecord::new("b", 1, "refrigerator", "Active");

        assert!(lower.is_active());
        assert!(!title.is_active());
        // Display classification still folds case
        assert_eq!(title.status_class(), StatusClass::Active);
    }
}
