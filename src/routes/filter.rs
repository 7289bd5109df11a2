//! Filter endpoints. Both work on the last fetched list; neither calls the store.

use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::services::filter::FilterCriteria;
use crate::services::map_view::MapSnapshot;

/// Show only the points matching the criteria.
#[utoipa::path(
    post,
    path = "/api/v1/filter",
    tag = "Filter",
    request_body = FilterCriteria,
    responses(
        (status = 200, description = "Map state after filtering", body = MapSnapshot),
    )
)]
pub async fn apply_filter(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<MapSnapshot> {
    let mut view = state.view.write().await;
    let n = view.apply_filter(criteria);
    tracing::debug!("Filter applied, {} points match", n);
    Json(view.snapshot())
}

/// Clear the filter and show the whole last fetched list again.
#[utoipa::path(
    post,
    path = "/api/v1/filter/reset",
    tag = "Filter",
    responses(
        (status = 200, description = "Map state with all points", body = MapSnapshot),
    )
)]
pub async fn reset_filter(State(state): State<AppState>) -> Json<MapSnapshot> {
    let mut view = state.view.write().await;
    view.reset_filter();
    Json(view.snapshot())
}
