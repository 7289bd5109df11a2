//! Map view state: the last fetched point list, the marker layer and the
//! status panel.
//!
//! A full refresh is the only thing that replaces the point list. Filtering
//! reads that list, repaints the layer and updates the result count, and never
//! touches the store. If a refresh is in flight while a filter runs, the
//! filter sees whichever list was assigned last.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::filter::{filter_points, results_text, FilterCriteria};
use crate::services::markers::{locate_all, paint, Marker, MarkerLayer};
use crate::services::stats::{aggregate, temperature_range, Stats, StatsPanel};
use crate::store::client::PocketBaseClient;
use crate::store::models::WeatherPoint;

#[derive(Debug, Default)]
pub struct MapView {
    points: Vec<WeatherPoint>,
    layer: MarkerLayer,
    stats: Stats,
    criteria: FilterCriteria,
    filter_results: Option<usize>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Shared map view handle.
pub type SharedMapView = Arc<RwLock<MapView>>;

/// What the map widget needs to draw the current state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapSnapshot {
    /// Markers currently on the map
    pub markers: Vec<Marker>,
    /// Status panel (count, max, min, average)
    pub stats: StatsPanel,
    /// Criteria the markers were drawn with; empty after a full refresh
    pub filter: FilterCriteria,
    /// "Results: N" after the last filter apply/reset, absent before the first one
    pub filter_results: Option<String>,
    /// Number of records in the last fetched list, including unlocated ones
    pub total_points: usize,
    /// When the point list was last replaced
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the point list and repaint everything. The layer now shows the
    /// whole list, so the active criteria are cleared; the last result text
    /// stays until the next apply or reset.
    pub fn replace_points(&mut self, points: Vec<WeatherPoint>) {
        self.points = points;
        self.criteria = FilterCriteria::default();
        let located = locate_all(&self.points);
        self.stats = aggregate(&located);
        self.layer.clear();
        paint(&mut self.layer, &located, self.stats.t_min, self.stats.t_max);
        self.refreshed_at = Some(Utc::now());
    }

    /// Repaint only the points matching `criteria`. Returns the match count.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) -> usize {
        let criteria = criteria.normalized();
        let located = locate_all(&self.points);
        let matching = filter_points(&located, &criteria);
        let (t_min, t_max) = temperature_range(&matching);

        self.layer.clear();
        if !matching.is_empty() {
            paint(&mut self.layer, &matching, t_min, t_max);
        }

        let n = matching.len();
        self.filter_results = Some(n);
        self.criteria = criteria;
        n
    }

    /// Clear the filter and repaint the whole last fetched list.
    pub fn reset_filter(&mut self) -> usize {
        self.apply_filter(FilterCriteria::default())
    }

    pub fn points(&self) -> &[WeatherPoint] {
        &self.points
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            markers: self.layer.markers().to_vec(),
            stats: self.stats.panel(),
            filter: self.criteria.clone(),
            filter_results: self.filter_results.map(results_text),
            total_points: self.points.len(),
            refreshed_at: self.refreshed_at,
        }
    }
}

/// Fetch the point list and repaint the view. Returns the number of records.
pub async fn refresh_view(
    store: &PocketBaseClient,
    view: &SharedMapView,
) -> Result<usize, AppError> {
    let points = store.list_points().await?;
    let n = points.len();
    view.write().await.replace_points(points);
    tracing::debug!("Map view refreshed with {} points", n);
    Ok(n)
}
