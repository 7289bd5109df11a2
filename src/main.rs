// Weather Map API v0.1
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;
mod store;

use config::AppConfig;
use routes::AppState;
use services::geocode::NominatimClient;
use services::map_view::{MapView, SharedMapView};
use services::sync::Syncer;
use services::weather::OpenMeteoClient;
use store::client::PocketBaseClient;

/// Weather Map API OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Map API",
        version = "0.1.0",
        description = "Weather-tagged map points. Keeps a PocketBase collection of \
            points enriched with place names (Nominatim) and current weather \
            (Open-Meteo), and serves temperature statistics, categorized map \
            markers and filtered views of the last fetched list.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Map", description = "Markers, status panel and legend"),
        (name = "Points", description = "Point listing and creation"),
        (name = "Filter", description = "Filtering the last fetched list"),
        (name = "Sync", description = "Enrichment passes and their status"),
    ),
    paths(
        routes::health::health_check,
        routes::map::get_map,
        routes::map::get_legend,
        routes::points::list_points,
        routes::points::create_point,
        routes::filter::apply_filter,
        routes::filter::reset_filter,
        routes::sync::run_sync,
        routes::sync::get_sync_status,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::map::LegendResponse,
            routes::points::CreatePointRequest,
            routes::points::CreatePointResponse,
            services::map_view::MapSnapshot,
            services::markers::Marker,
            services::icons::IconCategory,
            services::icons::IconGeometry,
            services::icons::LegendEntry,
            services::stats::StatsPanel,
            services::filter::FilterCriteria,
            services::sync::SyncReport,
            services::sync::SyncStatus,
            store::models::WeatherPoint,
            store::models::GeoPoint,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_map_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let timeout = config.request_timeout_secs.map(Duration::from_secs);

    let clients = PocketBaseClient::new(&config.pocketbase_url, &config.collection, timeout)
        .and_then(|store| {
            let geocoder =
                NominatimClient::new(&config.nominatim_url, &config.user_agent, timeout)?;
            let weather =
                OpenMeteoClient::new(&config.open_meteo_url, &config.user_agent, timeout)?;
            Ok((store, geocoder, weather))
        });
    let (store, geocoder, weather) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!("Failed to build HTTP clients: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Point store: {} (collection '{}')",
        config.pocketbase_url,
        config.collection
    );

    // Shared map view, filled by the first sync pass
    let view: SharedMapView = Arc::new(RwLock::new(MapView::new()));
    let syncer = Syncer::new(
        store.clone(),
        geocoder,
        weather,
        view.clone(),
        config.enrich_concurrency,
    );

    let app_state = AppState {
        store,
        view,
        syncer: syncer.clone(),
    };

    // Initial pass on startup, then optionally on a timer
    let initial = syncer.clone();
    tokio::spawn(async move {
        // Errors are logged and recorded in the sync status.
        let _ = initial.run().await;
    });
    if config.sync_interval_secs > 0 {
        tokio::spawn(syncer.run_periodic(Duration::from_secs(config.sync_interval_secs)));
    }

    // CORS: the map page reads markers and posts clicks and filters
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    let app = routes::api_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server terminated unexpectedly: {}", e);
        std::process::exit(1);
    }
}
