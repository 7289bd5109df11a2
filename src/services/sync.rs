//! Enrichment pass: bring every stored point's place name and weather up to
//! date, then refresh the map view.
//!
//! Architecture:
//! - List the first page of points from the store
//! - Feed them through a bounded queue (`buffered(concurrency)`, 1 by default)
//!   so provider calls for different points never overlap unless configured to
//! - Per point: reverse geocode if the description is blank, fetch current
//!   weather, persist the merged fields. Each step may fail on its own; the
//!   failure is logged and the pass moves on
//! - After the last point, refresh the view exactly once
//! - Passes are serialized by an async mutex; status is kept in memory
//!   (`Arc<RwLock<SyncStatus>>`) for the status endpoint

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::geocode::NominatimClient;
use crate::services::map_view::{refresh_view, SharedMapView};
use crate::services::weather::{CurrentReadings, OpenMeteoClient};
use crate::store::client::PocketBaseClient;
use crate::store::models::{PointFields, WeatherPoint};

// ---------------------------------------------------------------------------
// Reports and status (in-memory, shared via Arc<RwLock<>>)
// ---------------------------------------------------------------------------

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SyncReport {
    pub started_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    /// Records returned by the store
    pub fetched: usize,
    /// Records skipped because they have no usable coordinates
    pub skipped_unlocated: usize,
    pub geocoded: usize,
    pub geocode_failures: usize,
    pub weather_updated: usize,
    pub weather_failures: usize,
    pub persisted: usize,
    pub persist_failures: usize,
    /// Whether the closing view refresh succeeded
    pub refreshed: bool,
}

/// Pass history, exposed via the status endpoint.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SyncStatus {
    /// A pass is currently running
    pub running: bool,
    pub total_passes: u64,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Error of the last pass, if it could not list the store
    pub last_error: Option<String>,
    /// Report of the last pass that got past listing
    pub last_report: Option<SyncReport>,
}

/// Shared sync status handle.
pub type SharedSyncStatus = Arc<RwLock<SyncStatus>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    NotNeeded,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct PointOutcome {
    located: bool,
    geocode: Step,
    weather: Step,
    persist: Step,
}

impl PointOutcome {
    fn unlocated() -> Self {
        Self {
            located: false,
            geocode: Step::NotNeeded,
            weather: Step::NotNeeded,
            persist: Step::NotNeeded,
        }
    }
}

impl SyncReport {
    fn record(&mut self, outcome: PointOutcome) {
        if !outcome.located {
            self.skipped_unlocated += 1;
            return;
        }
        match outcome.geocode {
            Step::Done => self.geocoded += 1,
            Step::Failed => self.geocode_failures += 1,
            Step::NotNeeded => {}
        }
        match outcome.weather {
            Step::Done => self.weather_updated += 1,
            Step::Failed => self.weather_failures += 1,
            Step::NotNeeded => {}
        }
        match outcome.persist {
            Step::Done => self.persisted += 1,
            Step::Failed => self.persist_failures += 1,
            Step::NotNeeded => {}
        }
    }
}

/// Overwrite readings the provider actually returned; keep the rest.
pub fn merge_readings(fields: &mut PointFields, readings: CurrentReadings) {
    if let Some(t) = readings.temperature {
        fields.temperature = Some(t);
    }
    if let Some(h) = readings.humidity {
        fields.humidity = Some(h);
    }
    if let Some(p) = readings.precipitation {
        fields.precipitation = Some(p);
    }
}

// ---------------------------------------------------------------------------
// Syncer
// ---------------------------------------------------------------------------

/// Runs enrichment passes against the store and providers.
#[derive(Debug, Clone)]
pub struct Syncer {
    store: PocketBaseClient,
    geocoder: NominatimClient,
    weather: OpenMeteoClient,
    view: SharedMapView,
    status: SharedSyncStatus,
    concurrency: usize,
    gate: Arc<Mutex<()>>,
}

impl Syncer {
    pub fn new(
        store: PocketBaseClient,
        geocoder: NominatimClient,
        weather: OpenMeteoClient,
        view: SharedMapView,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            geocoder,
            weather,
            view,
            status: Arc::new(RwLock::new(SyncStatus::default())),
            concurrency: concurrency.max(1),
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn status(&self) -> SharedSyncStatus {
        self.status.clone()
    }

    /// Run one full pass. Waits for any pass already in progress.
    ///
    /// Only a failure to list the store is returned as an error; per-point
    /// failures are counted in the report.
    pub async fn run(&self) -> Result<SyncReport, AppError> {
        let _gate = self.gate.lock().await;
        let started_at = Utc::now();

        {
            let mut s = self.status.write().await;
            s.running = true;
            s.last_started_at = Some(started_at);
        }

        let result = self.run_pass(started_at).await;

        {
            let mut s = self.status.write().await;
            s.running = false;
            s.total_passes += 1;
            s.last_completed_at = Some(Utc::now());
            match &result {
                Ok(report) => {
                    s.last_error = None;
                    s.last_report = Some(report.clone());
                }
                Err(e) => s.last_error = Some(e.to_string()),
            }
        }

        match &result {
            Ok(report) => tracing::info!(
                "Sync: pass complete in {}ms ({} fetched, {} persisted, {} geocode / {} weather / {} persist failures)",
                report.duration_ms,
                report.fetched,
                report.persisted,
                report.geocode_failures,
                report.weather_failures,
                report.persist_failures,
            ),
            Err(e) => tracing::error!("Sync: pass aborted: {}", e),
        }

        result
    }

    async fn run_pass(&self, started_at: DateTime<Utc>) -> Result<SyncReport, AppError> {
        let points = self.store.list_points().await?;

        let mut report = SyncReport {
            started_at: Some(started_at),
            fetched: points.len(),
            ..Default::default()
        };

        let outcomes: Vec<PointOutcome> = stream::iter(points)
            .map(|point| self.enrich_point(point))
            .buffered(self.concurrency)
            .collect()
            .await;
        for outcome in outcomes {
            report.record(outcome);
        }

        match refresh_view(&self.store, &self.view).await {
            Ok(_) => report.refreshed = true,
            Err(e) => tracing::error!("Sync: view refresh failed: {}", e),
        }

        report.duration_ms = (Utc::now() - started_at).num_milliseconds().max(0) as u64;
        Ok(report)
    }

    async fn enrich_point(&self, point: WeatherPoint) -> PointOutcome {
        let Some((lat, lon)) = point.coordinates() else {
            tracing::warn!("Sync: point {} has no usable coordinates, skipping", point.id);
            return PointOutcome::unlocated();
        };

        let mut fields = point.fields();

        let geocode = if point.needs_description() {
            match self.geocoder.reverse(lat, lon).await {
                Ok(place) => {
                    fields.description = Some(place.place_label());
                    Step::Done
                }
                Err(e) => {
                    tracing::warn!("Sync: reverse geocode failed for point {}: {}", point.id, e);
                    Step::Failed
                }
            }
        } else {
            Step::NotNeeded
        };

        let weather = match self.weather.current(lat, lon).await {
            Ok(readings) => {
                merge_readings(&mut fields, readings);
                Step::Done
            }
            Err(e) => {
                tracing::warn!("Sync: weather lookup failed for point {}: {}", point.id, e);
                Step::Failed
            }
        };

        let persist = match self.store.update_point(&point.id, &fields).await {
            Ok(_) => Step::Done,
            Err(e) => {
                tracing::error!("Sync: failed to persist point {}: {}", point.id, e);
                Step::Failed
            }
        };

        PointOutcome {
            located: true,
            geocode,
            weather,
            persist,
        }
    }

    /// Run a pass every `interval`, forever. Spawn with `tokio::spawn`.
    pub async fn run_periodic(self, interval: Duration) {
        tracing::info!("Periodic sync every {}s", interval.as_secs());
        loop {
            tokio::time::sleep(interval).await;
            // Errors are already logged and recorded in the status.
            let _ = self.run().await;
        }
    }
}
