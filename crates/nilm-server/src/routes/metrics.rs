//! Metrics Routes - Raw appliance telemetry

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::models::{ApplianceFilter, ApplianceMetric};
use crate::routes::domain_error;
use crate::AppState;

/// Latest telemetry rows of a house
#[utoipa::path(
    get,
    path = "/nilm/houses/{house_id}/metrics",
    params(
        ("house_id" = String, Path, description = "House identifier (1-6)"),
        ApplianceFilter
    ),
    responses(
        (status = 200, description = "Up to 50 rows, newest first", body = Vec<ApplianceMetric>),
        (status = 400, description = "Invalid house or appliance"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Metrics"
)]
pub async fn list_metrics(
    State(state): State<AppState>,
    Path(house_id): Path<String>,
    Query(filter): Query<ApplianceFilter>,
) -> Result<Json<Vec<ApplianceMetric>>, (axum::http::StatusCode, String)> {
    let rows = state
        .dashboard_service
        .metrics(&house_id, filter.appliance.as_deref())
        .await
        .map_err(domain_error)?;

    Ok(Json(rows.into_iter().map(ApplianceMetric::from).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/nilm/houses/:house_id/metrics", get(list_metrics))
}
