//! Sync HTTP endpoints.
//!
//! - POST /api/v1/sync: run an enrichment pass now
//! - GET /api/v1/sync/status: state of the last passes

use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::services::sync::{SyncReport, SyncStatus};

/// Run an enrichment pass and refresh the map view.
///
/// Waits for a pass already in progress to finish first.
#[utoipa::path(
    post,
    path = "/api/v1/sync",
    tag = "Sync",
    responses(
        (status = 200, description = "Pass finished (per-point failures are counted, not fatal)", body = SyncReport),
        (status = 502, description = "Point store could not be listed", body = ErrorResponse),
    )
)]
pub async fn run_sync(State(state): State<AppState>) -> Result<Json<SyncReport>, AppError> {
    let report = state.syncer.run().await?;
    Ok(Json(report))
}

/// Get the current sync status.
#[utoipa::path(
    get,
    path = "/api/v1/sync/status",
    tag = "Sync",
    responses(
        (status = 200, description = "Current sync status", body = SyncStatus),
    )
)]
pub async fn get_sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    let status = state.syncer.status();
    let s = status.read().await;
    Json(s.clone())
}
