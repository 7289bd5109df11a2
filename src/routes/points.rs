//! Point endpoints.
//!
//! - GET /api/v1/points: last fetched list, as stored
//! - POST /api/v1/points: map click: create a bare point and run a sync pass

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::services::sync::SyncReport;
use crate::store::models::{NewPoint, WeatherPoint};

/// Body of a map click.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePointRequest {
    /// Latitude (WGS84), -90 to 90
    pub lat: f64,
    /// Longitude (WGS84), -180 to 180
    pub lon: f64,
}

impl CreatePointRequest {
    fn validate(&self) -> Result<(), AppError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Invalid coordinates ({}, {}): latitude must be -90 to 90, longitude -180 to 180",
                self.lat, self.lon
            )))
        }
    }
}

/// Response type for POST /api/v1/points.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePointResponse {
    /// The record as created by the store (before enrichment)
    pub point: WeatherPoint,
    /// Report of the pass that followed; absent if the pass could not list the store
    pub sync: Option<SyncReport>,
}

/// Records from the last full refresh, including ones without coordinates.
#[utoipa::path(
    get,
    path = "/api/v1/points",
    tag = "Points",
    responses(
        (status = 200, description = "Last fetched point list", body = Vec<WeatherPoint>),
    )
)]
pub async fn list_points(State(state): State<AppState>) -> Json<Vec<WeatherPoint>> {
    Json(state.view.read().await.points().to_vec())
}

/// Create a bare point at the clicked coordinate, then enrich and refresh.
#[utoipa::path(
    post,
    path = "/api/v1/points",
    tag = "Points",
    request_body = CreatePointRequest,
    responses(
        (status = 201, description = "Point created", body = CreatePointResponse),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 502, description = "Point store rejected the record", body = ErrorResponse),
    )
)]
pub async fn create_point(
    State(state): State<AppState>,
    Json(req): Json<CreatePointRequest>,
) -> Result<(StatusCode, Json<CreatePointResponse>), AppError> {
    req.validate()?;

    let point = state
        .store
        .create_point(&NewPoint::bare(req.lat, req.lon))
        .await?;
    tracing::info!("Created point {} at ({}, {})", point.id, req.lat, req.lon);

    // The record exists at this point; a failed pass is reported, not raised.
    let sync = state.syncer.run().await.ok();

    Ok((StatusCode::CREATED, Json(CreatePointResponse { point, sync })))
}
