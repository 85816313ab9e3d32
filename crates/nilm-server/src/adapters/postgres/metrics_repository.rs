//! PostgreSQL implementation of MetricsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nilm::{ApplianceRecord, DomainError, MetricsQuery, MetricsRepository};

/// PostgreSQL implementation of MetricsRepository
pub struct PgMetricsRepository {
    pool: PgPool,
}

impl PgMetricsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct MetricRow {
    id: Uuid,
    house_id: i32,
    appliance_name: String,
    current_power_kw: Option<f64>,
    total_energy_kwh_day: Option<f64>,
    peak_energy_kwh: Option<f64>,
    longest_on_duration_hrs: Option<f64>,
    efficiency_percentage: Option<f64>,
    potential_savings_year: Option<f64>,
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<MetricRow> for ApplianceRecord {
    fn from(row: MetricRow) -> Self {
        Self {
            id: row.id.to_string(),
            house_id: row.house_id,
            appliance_name: row.appliance_name,
            current_power_kw: row.current_power_kw,
            total_energy_kwh_day: row.total_energy_kwh_day,
            peak_energy_kwh: row.peak_energy_kwh,
            longest_on_duration_hrs: row.longest_on_duration_hrs,
            efficiency_percentage: row.efficiency_percentage,
            potential_savings_year: row.potential_savings_year,
            status: row.status,
            timestamp: row.timestamp,
        }
    }
}

#[async_trait]
impl MetricsRepository for PgMetricsRepository {
    async fn fetch(&self, query: &MetricsQuery) -> Result<Vec<ApplianceRecord>, DomainError> {
        let rows = match query.appliance {
            Some(kind) => {
                sqlx::query_as::<_, MetricRow>(
                    r#"
                    SELECT * FROM appliance_metrics
                    WHERE house_id = $1 AND appliance_name = $2
                    ORDER BY timestamp DESC
                    LIMIT $3
                    "#,
                )
                .bind(query.house_id)
                .bind(kind.as_str())
                .bind(query.limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MetricRow>(
                    r#"
                    SELECT * FROM appliance_metrics
                    WHERE house_id = $1
                    ORDER BY timestamp DESC
                    LIMIT $2
                    "#,
                )
                .bind(query.house_id)
                .bind(query.limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
