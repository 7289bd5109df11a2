pub mod filter;
pub mod health;
pub mod map;
pub mod points;
pub mod sync;

use axum::routing::{get, post};
use axum::Router;

use crate::services::map_view::SharedMapView;
use crate::services::sync::Syncer;
use crate::store::client::PocketBaseClient;

/// Shared application state for all endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: PocketBaseClient,
    pub(crate) view: SharedMapView,
    pub(crate) syncer: Syncer,
}

/// API routes (without docs, CORS or tracing layers).
pub(crate) fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/map", get(map::get_map))
        .route("/api/v1/legend", get(map::get_legend))
        .route(
            "/api/v1/points",
            get(points::list_points).post(points::create_point),
        )
        .route("/api/v1/filter", post(filter::apply_filter))
        .route("/api/v1/filter/reset", post(filter::reset_filter))
        .route("/api/v1/sync", post(sync::run_sync))
        .route("/api/v1/sync/status", get(sync::get_sync_status))
        .with_state(state)
}
