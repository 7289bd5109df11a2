//! Marker rendering.
//!
//! Turning stored points into map markers happens in two steps:
//!
//! 1. [`locate_all`] keeps only points whose coordinates are both present and
//!    finite. This is the one place the "has coordinates" check lives; every
//!    rendering and aggregation function takes [`LocatedPoint`]s.
//! 2. [`paint`] categorizes each located point against a temperature range and
//!    appends a [`Marker`] to a [`MarkerLayer`].
//!
//! The layer only grows. Whoever starts a fresh batch clears it first.

use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::{escape_html, finite, format_reading};
use crate::services::geocode::UNKNOWN_PLACE;
use crate::services::icons::{categorize, IconCategory};
use crate::store::models::WeatherPoint;

/// A stored point known to have valid coordinates.
#[derive(Debug, Clone, Copy)]
pub struct LocatedPoint<'a> {
    pub point: &'a WeatherPoint,
    pub lat: f64,
    pub lon: f64,
}

impl<'a> LocatedPoint<'a> {
    pub fn temperature(&self) -> Option<f64> {
        self.point.temperature.and_then(finite)
    }
}

/// The renderable subset of `points`, in their original order.
pub fn locate_all(points: &[WeatherPoint]) -> Vec<LocatedPoint<'_>> {
    points
        .iter()
        .filter_map(|point| {
            let (lat, lon) = point.coordinates()?;
            Some(LocatedPoint { point, lat, lon })
        })
        .collect()
}

/// A marker ready for the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Marker {
    /// Id of the store record this marker shows
    pub point_id: String,
    pub lat: f64,
    pub lon: f64,
    pub category: IconCategory,
    pub icon_url: String,
    /// Popup body (HTML)
    pub popup_html: String,
}

/// Markers currently on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn add(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// Popup body for a point. Missing readings show "N/A", a missing or blank
/// description shows "Unknown".
pub fn popup_html(point: &WeatherPoint) -> String {
    let description = point
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(UNKNOWN_PLACE);

    format!(
        "<strong>{}</strong><br/>\ntemperature: {}°C<br/>\nhumidity: {}%<br/>\nprecipitation: {} mm",
        escape_html(description),
        format_reading(point.temperature),
        format_reading(point.humidity),
        format_reading(point.precipitation),
    )
}

/// Build the marker for one located point.
pub fn render_marker(located: &LocatedPoint<'_>, category: IconCategory) -> Marker {
    Marker {
        point_id: located.point.id.clone(),
        lat: located.lat,
        lon: located.lon,
        category,
        icon_url: category.asset().to_string(),
        popup_html: popup_html(located.point),
    }
}

/// Append a marker for every point, categorized against `t_min`/`t_max`.
pub fn paint(layer: &mut MarkerLayer, points: &[LocatedPoint<'_>], t_min: f64, t_max: f64) {
    for located in points {
        let category = categorize(located.point, t_min, t_max);
        layer.add(render_marker(located, category));
    }
}
