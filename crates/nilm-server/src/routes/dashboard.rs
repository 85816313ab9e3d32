//! Dashboard Routes - Energy overview for a house
//!
//! Everything the overview page shows, computed from one fetch.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::models::{
    ApplianceFilter, DashboardResponse, DashboardTotals, EfficiencyEntry, TimelinePoint,
};
use crate::routes::domain_error;
use crate::AppState;

/// Get house dashboard
#[utoipa::path(
    get,
    path = "/nilm/houses/{house_id}/dashboard",
    params(
        ("house_id" = String, Path, description = "House identifier (1-6)"),
        ApplianceFilter
    ),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 400, description = "Invalid house or appliance"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(house_id): Path<String>,
    Query(filter): Query<ApplianceFilter>,
) -> Result<Json<DashboardResponse>, (axum::http::StatusCode, String)> {
    let snapshot = state
        .dashboard_service
        .snapshot(&house_id, filter.appliance.as_deref())
        .await
        .map_err(domain_error)?;

    Ok(Json(DashboardResponse {
        house_id: snapshot.house_id,
        appliance: filter
            .appliance
            .unwrap_or_else(|| nilm::domain::ALL_APPLIANCES.to_string()),
        overview: DashboardTotals::from(snapshot.overview),
        recommendations: snapshot.recommendations,
        timeline: snapshot.timeline.into_iter().map(TimelinePoint::from).collect(),
        efficiency: snapshot
            .efficiency
            .into_iter()
            .map(EfficiencyEntry::from)
            .collect(),
        context: snapshot.context,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/nilm/houses/:house_id/dashboard", get(get_dashboard))
}
