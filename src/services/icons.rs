//! Icon category policy and legend.

use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::finite;
use crate::store::models::WeatherPoint;

/// Display category of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Rain,
    Low,
    High,
    Sun,
}

impl IconCategory {
    /// Icon asset served to the map widget.
    pub fn asset(self) -> &'static str {
        match self {
            IconCategory::Rain => "rain.png",
            IconCategory::Low => "low.png",
            IconCategory::High => "high.png",
            IconCategory::Sun => "sun.png",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IconCategory::Rain => "Rainy",
            IconCategory::Low => "Low temperature",
            IconCategory::High => "High temperature",
            IconCategory::Sun => "Sunny",
        }
    }
}

/// Pick the category of a point against the range of the set being drawn.
///
/// First match wins: any positive precipitation is `Rain`; a temperature equal
/// to `t_min` is `Low`; equal to `t_max` is `High`; everything else is `Sun`.
/// When `t_min == t_max` the point is `Low`.
pub fn categorize(point: &WeatherPoint, t_min: f64, t_max: f64) -> IconCategory {
    if point.precipitation.and_then(finite).is_some_and(|p| p > 0.0) {
        return IconCategory::Rain;
    }
    match point.temperature.and_then(finite) {
        Some(t) if t == t_min => IconCategory::Low,
        Some(t) if t == t_max => IconCategory::High,
        _ => IconCategory::Sun,
    }
}

/// Icon size and anchors, shared by all categories (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct IconGeometry {
    pub width: u32,
    pub height: u32,
    /// Point of the icon placed on the coordinate, from the top-left corner
    pub anchor_x: i32,
    pub anchor_y: i32,
    /// Popup offset relative to the anchor
    pub popup_anchor_x: i32,
    pub popup_anchor_y: i32,
}

pub const ICON_GEOMETRY: IconGeometry = IconGeometry {
    width: 40,
    height: 40,
    anchor_x: 20,
    anchor_y: 40,
    popup_anchor_x: 0,
    popup_anchor_y: -30,
};

/// A single legend row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LegendEntry {
    pub category: IconCategory,
    pub icon_url: String,
    pub label: String,
}

/// Legend rows in display order.
pub fn legend() -> Vec<LegendEntry> {
    [
        IconCategory::High,
        IconCategory::Low,
        IconCategory::Sun,
        IconCategory::Rain,
    ]
    .into_iter()
    .map(|category| LegendEntry {
        category,
        icon_url: category.asset().to_string(),
        label: category.label().to_string(),
    })
    .collect()
}
