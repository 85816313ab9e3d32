//! Dashboard context summary
//!
//! Reduces the appliance rows currently on screen into a short text block
//! that is injected into the prompt. The aggregate values and their
//! rounding are the stable part; the prose around them is cosmetic.

use serde::Serialize;

use super::number_format::{plain_number, serialize_plain_number, to_fixed};
use crate::domain::entities::ApplianceRecord;

/// Per-appliance detail carried into the prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSnapshot {
    pub name: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_plain_number"
    )]
    pub power: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_plain_number"
    )]
    pub efficiency: Option<f64>,
    pub status: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_plain_number"
    )]
    pub daily_energy: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_plain_number"
    )]
    pub potential_savings: Option<f64>,
}

impl From<&ApplianceRecord> for ApplianceSnapshot {
    fn from(record: &ApplianceRecord) -> Self {
        Self {
            name: record.appliance_name.clone(),
            power: record.current_power_kw,
            efficiency: record.efficiency_percentage,
            status: record.status.clone(),
            daily_energy: record.total_energy_kwh_day,
            potential_savings: record.potential_savings_year,
        }
    }
}

/// Aggregated snapshot of the dashboard, built right before a generation call
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardContext {
    pub house_id: String,
    pub total_power: f64,
    pub avg_efficiency: f64,
    pub active_count: usize,
    pub total_savings: f64,
    pub appliances: Vec<ApplianceSnapshot>,
}

impl DashboardContext {
    /// Aggregate `rows`; `None` when there is nothing to summarize.
    ///
    /// Missing readings count as zero, and the efficiency mean divides by
    /// the full row count.
    pub fn from_rows(rows: &[ApplianceRecord], house_id: &str) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let total_power = rows.iter().map(ApplianceRecord::power_or_zero).sum();
        let efficiency_sum: f64 = rows.iter().map(ApplianceRecord::efficiency_or_zero).sum();
        let active_count = rows.iter().filter(|r| r.is_active()).count();
        let total_savings = rows.iter().map(ApplianceRecord::savings_or_zero).sum();

        Some(Self {
            house_id: house_id.to_string(),
            total_power,
            avg_efficiency: efficiency_sum / rows.len() as f64,
            active_count,
            total_savings,
            appliances: rows.iter().map(ApplianceSnapshot::from).collect(),
        })
    }

    /// Render the multi-line block embedded in the prompt
    pub fn render(&self) -> String {
        let appliances =
            serde_json::to_string(&self.appliances).unwrap_or_else(|_| "[]".to_string());

        format!(
            "Current dashboard context for House {house}:\n\
             - Total Power Consumption: {power} kW\n\
             - Average Efficiency: {efficiency}%\n\
             - Active Devices: {active}\n\
             - Total Potential Annual Savings: ${savings}\n\
             - Appliances data: {appliances}",
            house = self.house_id,
            power = to_fixed(self.total_power, 2),
            efficiency = to_fixed(self.avg_efficiency, 0),
            active = self.active_count,
            savings = plain_number(self.total_savings),
        )
    }
}

/// Summarize `rows` for house `house_id`; empty rows give an empty string.
pub fn summarize(rows: &[ApplianceRecord], house_id: &str) -> String {
    DashboardContext::from_rows(rows, house_id)
        .map(|context| context.render())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fridge() -> ApplianceRecord {
        ApplianceRecord::new("r1", 1, "refrigerator", "active")
            .with_power(0.15)
            .with_efficiency(82.0)
            .with_daily_energy(3.6)
            .with_savings(40.0)
    }

    fn aggregate_lines(summary: &str) -> Vec<&str> {
        summary
            .lines()
            .filter(|l| !l.starts_with("- Appliances data"))
            .collect()
    }

    #[test]
    fn test_empty_rows_give_empty_string() {
        assert_eq!(summarize(&[], "1"), "");
        assert_eq!(summarize(&[], "anything"), "");
        assert!(DashboardContext::from_rows(&[], "1").is_none());
    }

    #[test]
    fn test_single_refrigerator_example() {
        let summary = summarize(&[fridge()], "1");

        assert!(summary.starts_with("Current dashboard context for House 1:"));
        assert!(summary.contains("Total Power Consumption: 0.15 kW"));
        assert!(summary.contains("Average Efficiency: 82%"));
        assert!(summary.contains("Active Devices: 1"));
        assert!(summary.contains("Total Potential Annual Savings: $40"));
        assert!(summary.contains(
            r#"[{"name":"refrigerator","power":0.15,"efficiency":82,"status":"active","dailyEnergy":3.6,"potentialSavings":40}]"#
        ));
    }

    #[test]
    fn test_house_id_is_echoed_verbatim() {
        let summary = summarize(&[fridge()], "House-Seven ");
        assert!(summary.starts_with("Current dashboard context for House House-Seven :"));
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let rows = vec![
            ApplianceRecord::new("a", 1, "microwave", "off")
                .with_power(1.2)
                .with_efficiency(90.0),
            // No readings at all
            ApplianceRecord::new("b", 1, "dish_washer", "standby"),
            ApplianceRecord::new("c", 1, "washer_dryer", "active").with_savings(12.5),
        ];

        let context = DashboardContext::from_rows(&rows, "3").unwrap();
        assert!((context.total_power - 1.2).abs() < 1e-9);
        // Denominator is the full row count, not the count of present values
        assert!((context.avg_efficiency - 30.0).abs() < 1e-9);
        assert_eq!(context.total_savings, 12.5);

        let summary = context.render();
        assert!(summary.contains("Total Power Consumption: 1.20 kW"));
        assert!(summary.contains("Average Efficiency: 30%"));
        assert!(summary.contains("Total Potential Annual Savings: $12.5"));
        // Absent readings are left out of the per-row detail
        assert!(summary.contains(r#"{"name":"dish_washer","status":"standby"}"#));
    }

    #[test]
    fn test_active_count_is_exact_match() {
        let rows = vec![
            ApplianceRecord::new("a", 1, "refrigerator", "active"),
            ApplianceRecord::new("b", 1, "microwave", "Active"),
            ApplianceRecord::new("c", 1, "dish_washer", "ACTIVE"),
            ApplianceRecord::new("d", 1, "washer_dryer", " active"),
        ];

        let context = DashboardContext::from_rows(&rows, "1").unwrap();
        assert_eq!(context.active_count, 1);
        assert!(context.render().contains("Active Devices: 1"));
    }

    #[test]
    fn test_average_efficiency_rounds_half_up() {
        let rows = vec![
            ApplianceRecord::new("a", 1, "refrigerator", "active").with_efficiency(82.0),
            ApplianceRecord::new("b", 1, "microwave", "off").with_efficiency(83.0),
        ];

        assert!(summarize(&rows, "1").contains("Average Efficiency: 83%"));
    }

    #[test]
    fn test_aggregates_are_order_independent_list_is_order_preserving() {
        let rows = vec![
            fridge(),
            ApplianceRecord::new("m", 1, "microwave", "standby")
                .with_power(0.8)
                .with_efficiency(65.0)
                .with_savings(120.0),
            ApplianceRecord::new("d", 1, "dish_washer", "active")
                .with_power(1.1)
                .with_efficiency(71.0),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = summarize(&rows, "2");
        let backward = summarize(&reversed, "2");

        assert_eq!(aggregate_lines(&forward), aggregate_lines(&backward));

        let fridge_at = forward.find("refrigerator").unwrap();
        let dish_at = forward.find("dish_washer").unwrap();
        assert!(fridge_at < dish_at);

        let fridge_at = backward.find("refrigerator").unwrap();
        let dish_at = backward.find("dish_washer").unwrap();
        assert!(dish_at < fridge_at);
    }
}
