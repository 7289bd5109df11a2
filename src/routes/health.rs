use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when healthy, "degraded" when the point store is unreachable)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether the point store answers its health probe
    pub store: bool,
}

/// Health check endpoint.
///
/// Probes the PocketBase health endpoint. Returns status "degraded" (still
/// 200) if the store is unreachable, so load balancers can distinguish
/// partial failures.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = state.store.is_healthy().await;

    Json(HealthResponse {
        status: if store_ok {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_ok,
    })
}
