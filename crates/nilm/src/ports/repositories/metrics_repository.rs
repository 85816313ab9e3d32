//! Metrics Repository Port
//!
//! Read access to appliance telemetry.

use async_trait::async_trait;

use crate::domain::{
    errors::DomainError, value_objects::ALL_APPLIANCES, ApplianceKind, ApplianceRecord,
};

/// Rows returned per fetch
pub const DEFAULT_METRICS_LIMIT: i64 = 50;

/// Filter for a metrics fetch
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsQuery {
    pub house_id: i32,
    /// `None` means every appliance
    pub appliance: Option<ApplianceKind>,
    pub limit: i64,
}

impl MetricsQuery {
    pub fn new(house_id: i32) -> Self {
        Self {
            house_id,
            appliance: None,
            limit: DEFAULT_METRICS_LIMIT,
        }
    }

    /// Build from the dashboard's selector values (`"3"`, `"microwave"` or `"all"`)
    pub fn from_selection(house: &str, appliance: Option<&str>) -> Result<Self, DomainError> {
        let house_id = house
            .trim()
            .parse::<i32>()
            .map_err(|_| DomainError::Validation(format!("Invalid house id: {}", house)))?;

        let appliance: Option<ApplianceKind> = match appliance {
            None => None,
            Some(name) if name == ALL_APPLIANCES => None,
            Some(name) => Some(name.parse().map_err(DomainError::Validation)?),
        };

        Ok(Self {
            appliance,
            ..Self::new(house_id)
        })
    }
}

/// Repository interface for appliance telemetry
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Most recent rows for a house, newest first, at most `query.limit`
    async fn fetch(&self, query: &MetricsQuery) -> Result<Vec<ApplianceRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_selection() {
        let query = MetricsQuery::from_selection("3", Some("microwave")).unwrap();
        assert_eq!(query.house_id, 3);
        assert_eq!(query.appliance, Some(ApplianceKind::Microwave));
        assert_eq!(query.limit, DEFAULT_METRICS_LIMIT);

        let all = MetricsQuery::from_selection("1", Some("all")).unwrap();
        assert_eq!(all.appliance, None);
    }

    #[test]
    fn test_query_rejects_bad_selection() {
        assert!(matches!(
            MetricsQuery::from_selection("one", None),
            Err(DomainError::Validation(_))
        ));
        assert!(MetricsQuery::from_selection("1", Some("toaster")).is_err());
    }
}
