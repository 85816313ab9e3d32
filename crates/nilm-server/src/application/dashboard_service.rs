//! Dashboard Application Service (Use Case)
//!
//! Fetches a house's telemetry and derives everything the overview shows.

use std::sync::Arc;

use nilm::domain::{
    efficiency_breakdown, power_timeline, recommendations, EfficiencyBar, PowerPoint,
};
use nilm::{
    summarize, ApplianceRecord, DashboardOverview, DomainError, MetricsQuery, MetricsRepository,
};

/// Derived view of one fetch
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub house_id: String,
    pub overview: DashboardOverview,
    pub recommendations: Vec<String>,
    pub timeline: Vec<PowerPoint>,
    pub efficiency: Vec<EfficiencyBar>,
    pub context: String,
}

/// Application service for dashboard reads
pub struct DashboardService<R: MetricsRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: MetricsRepository + ?Sized> DashboardService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Latest rows for a house, newest first
    pub async fn metrics(
        &self,
        house: &str,
        appliance: Option<&str>,
    ) -> Result<Vec<ApplianceRecord>, DomainError> {
        let query = MetricsQuery::from_selection(house, appliance)?;
        self.repo.fetch(&query).await
    }

    /// Latest rows plus every derived figure
    pub async fn snapshot(
        &self,
        house: &str,
        appliance: Option<&str>,
    ) -> Result<DashboardSnapshot, DomainError> {
        let rows = self.metrics(house, appliance).await?;
        let house_id = house.trim().to_string();

        tracing::debug!("Dashboard for house {}: {} rows", house_id, rows.len());

        Ok(DashboardSnapshot {
            overview: DashboardOverview::from_rows(&rows),
            recommendations: recommendations(&rows),
            timeline: power_timeline(&rows),
            efficiency: efficiency_breakdown(&rows),
            context: summarize(&rows, &house_id),
            house_id,
        })
    }
}
