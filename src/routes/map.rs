//! Map view endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::services::icons::{legend, IconGeometry, LegendEntry, ICON_GEOMETRY};
use crate::services::map_view::MapSnapshot;

/// Response type for GET /api/v1/legend.
#[derive(Debug, Serialize, ToSchema)]
pub struct LegendResponse {
    /// Size and anchors shared by every marker icon
    pub icon: IconGeometry,
    pub entries: Vec<LegendEntry>,
}

/// Current markers, status panel and filter result.
#[utoipa::path(
    get,
    path = "/api/v1/map",
    tag = "Map",
    responses(
        (status = 200, description = "Current map state", body = MapSnapshot),
    )
)]
pub async fn get_map(State(state): State<AppState>) -> Json<MapSnapshot> {
    Json(state.view.read().await.snapshot())
}

/// Marker legend.
#[utoipa::path(
    get,
    path = "/api/v1/legend",
    tag = "Map",
    responses(
        (status = 200, description = "Legend entries in display order", body = LegendResponse),
    )
)]
pub async fn get_legend() -> Json<LegendResponse> {
    Json(LegendResponse {
        icon: ICON_GEOMETRY,
        entries: legend(),
    })
}
