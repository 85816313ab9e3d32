//! Dashboard overview and recommendation rules
//!
//! Everything the dashboard shows next to the chat: headline numbers,
//! maintenance hints, the power timeline and the per-appliance
//! efficiency breakdown.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::number_format::{plain_number, to_fixed};
use crate::domain::entities::ApplianceRecord;
use crate::domain::value_objects::ApplianceKind;

/// Flat electricity rate used for the daily cost estimate ($/kWh)
pub const ENERGY_RATE_PER_KWH: f64 = 0.15;
/// Recommendations shown at once
pub const MAX_RECOMMENDATIONS: usize = 5;
/// Points on the power timeline
pub const TIMELINE_POINTS: usize = 20;

const LOW_EFFICIENCY_PERCENT: f64 = 70.0;
const LONG_RUN_HOURS: f64 = 12.0;
const HIGH_SAVINGS_PER_YEAR: f64 = 100.0;

/// Headline numbers of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub total_power_kw: f64,
    pub daily_cost: f64,
    pub average_efficiency: f64,
    pub active_devices: usize,
    pub sample_count: usize,
}

impl DashboardOverview {
    pub fn from_rows(rows: &[ApplianceRecord]) -> Self {
        let average_efficiency = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(ApplianceRecord::efficiency_or_zero).sum::<f64>() / rows.len() as f64
        };

        Self {
            total_power_kw: rows.iter().map(ApplianceRecord::power_or_zero).sum(),
            daily_cost: rows
                .iter()
                .map(|r| r.daily_energy_or_zero() * ENERGY_RATE_PER_KWH)
                .sum(),
            average_efficiency,
            active_devices: rows.iter().filter(|r| r.is_active()).count(),
            sample_count: rows.len(),
        }
    }

    /// `"1.23 kW"`
    pub fn power_label(&self) -> String {
        format!("{} kW", to_fixed(self.total_power_kw, 2))
    }

    /// `"$0.54"`
    pub fn cost_label(&self) -> String {
        format!("${}", to_fixed(self.daily_cost, 2))
    }

    /// `"82%"`
    pub fn efficiency_label(&self) -> String {
        format!("{}%", to_fixed(self.average_efficiency, 0))
    }
}

/// Apply the maintenance rules to every row, in row order, keeping the first few hints.
pub fn recommendations(rows: &[ApplianceRecord]) -> Vec<String> {
    let mut hints = Vec::new();

    for row in rows {
        let name = &row.appliance_name;

        if let Some(efficiency) = row
            .efficiency_percentage
            .filter(|e| *e < LOW_EFFICIENCY_PERCENT)
        {
            hints.push(format!(
                "{}: Low efficiency detected ({}%). Consider maintenance or replacement.",
                name,
                plain_number(efficiency)
            ));
        }
        if let Some(hours) = row.longest_on_duration_hrs.filter(|h| *h > LONG_RUN_HOURS) {
            hints.push(format!(
                "{}: Running continuously for {} hours. Check for optimal usage patterns.",
                name,
                to_fixed(hours, 1)
            ));
        }
        if let Some(savings) = row.potential_savings_year.filter(|s| *s > HIGH_SAVINGS_PER_YEAR) {
            hints.push(format!(
                "{}: Potential annual savings of ${}. Optimize usage during off-peak hours.",
                name,
                plain_number(savings)
            ));
        }
    }

    hints.truncate(MAX_RECOMMENDATIONS);
    hints
}

/// One point of the power chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerPoint {
    pub timestamp: DateTime<Utc>,
    pub power_kw: Option<f64>,
    pub appliance: String,
}

/// Chronological power series from rows ordered newest first
pub fn power_timeline(rows: &[ApplianceRecord]) -> Vec<PowerPoint> {
    let mut points: Vec<PowerPoint> = rows
        .iter()
        .take(TIMELINE_POINTS)
        .map(|r| PowerPoint {
            timestamp: r.timestamp,
            power_kw: r.current_power_kw,
            appliance: r.appliance_name.clone(),
        })
        .collect();
    points.reverse();
    points
}

/// Efficiency and savings of one appliance kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyBar {
    pub appliance: ApplianceKind,
    pub label: String,
    pub efficiency: f64,
    pub savings: f64,
}

/// One bar per known appliance kind, taken from its first (most recent) row
pub fn efficiency_breakdown(rows: &[ApplianceRecord]) -> Vec<EfficiencyBar> {
    ApplianceKind::ALL
        .iter()
        .map(|kind| {
            let latest = rows.iter().find(|r| r.appliance_name == kind.as_str());
            EfficiencyBar {
                appliance: *kind,
                label: kind.label(),
                efficiency: latest.map(ApplianceRecord::efficiency_or_zero).unwrap_or(0.0),
                savings: latest.map(ApplianceRecord::savings_or_zero).unwrap_or(0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_overview_of_empty_dashboard() {
        let overview = DashboardOverview::from_rows(&[]);
        assert_eq!(overview.total_power_kw, 0.0);
        assert_eq!(overview.average_efficiency, 0.0);
        assert_eq!(overview.efficiency_label(), "0%");
        assert_eq!(overview.cost_label(), "$0.00");
    }

    #[test]
    fn test_overview_daily_cost_uses_flat_rate() {
        let rows = vec![
            ApplianceRecord::new("a", 1, "refrigerator", "active")
                .with_power(0.15)
                .with_daily_energy(3.6),
            ApplianceRecord::new("b", 1, "microwave", "Active")
                .with_power(1.0)
                .with_daily_energy(0.4),
        ];

        let overview = DashboardOverview::from_rows(&rows);
        assert_eq!(overview.power_label(), "1.15 kW");
        assert_eq!(overview.cost_label(), "$0.60");
        assert_eq!(overview.active_devices, 1);
        assert_eq!(overview.sample_count, 2);
    }

    #[test]
    fn test_recommendation_rules() {
        let rows = vec![ApplianceRecord::new("a", 1, "washer_dryer", "active")
            .with_efficiency(62.0)
            .with_longest_on(13.25)
            .with_savings(150.0)];

        let hints = recommendations(&rows);
        assert_eq!(
            hints,
            vec![
                "washer_dryer: Low efficiency detected (62%). Consider maintenance or replacement."
                    .to_string(),
                "washer_dryer: Running continuously for 13.3 hours. Check for optimal usage patterns."
                    .to_string(),
                "washer_dryer: Potential annual savings of $150. Optimize usage during off-peak hours."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_recommendations_skip_missing_and_boundary_values() {
        let rows = vec![
            ApplianceRecord::new("a", 1, "refrigerator", "active"),
            ApplianceRecord::new("b", 1, "microwave", "off")
                .with_efficiency(70.0)
                .with_longest_on(12.0)
                .with_savings(100.0),
        ];
        assert!(recommendations(&rows).is_empty());
    }

    #[test]
    fn test_recommendations_are_capped() {
        let rows: Vec<_> = (0..4)
            .map(|i| {
                ApplianceRecord::new(format!("r{i}"), 1, "refrigerator", "active")
                    .with_efficiency(50.0)
                    .with_savings(200.0)
            })
            .collect();
        assert_eq!(recommendations(&rows).len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_power_timeline_is_chronological() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        // Newest first, as the repository returns them
        let rows: Vec<_> = (0..25)
            .map(|i| {
                ApplianceRecord::new(format!("r{i}"), 1, "microwave", "active")
                    .with_power(i as f64)
                    .with_timestamp(start - Duration::minutes(i))
            })
            .collect();

        let timeline = power_timeline(&rows);
        assert_eq!(timeline.len(), TIMELINE_POINTS);
        assert_eq!(timeline.first().unwrap().power_kw, Some(19.0));
        assert_eq!(timeline.last().unwrap().power_kw, Some(0.0));
        assert!(timeline.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_efficiency_breakdown_uses_first_match() {
        let rows = vec![
            ApplianceRecord::new("new", 1, "refrigerator", "active").with_efficiency(80.0),
            ApplianceRecord::new("old", 1, "refrigerator", "active").with_efficiency(60.0),
        ];

        let bars = efficiency_breakdown(&rows);
        assert_eq!(bars.len(), ApplianceKind::ALL.len());
        assert_eq!(bars[0].appliance, ApplianceKind::Refrigerator);
        assert_eq!(bars[0].efficiency, 80.0);
        assert_eq!(bars[1].label, "washer dryer");
        assert_eq!(bars[1].efficiency, 0.0);
    }
}
