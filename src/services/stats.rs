//! Temperature statistics over the displayed point set.

use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::{finite, NOT_AVAILABLE};
use crate::services::markers::LocatedPoint;

/// Aggregate temperature figures.
///
/// `t_max`/`t_min` start at −∞/+∞ and stay there when no point carries a
/// finite temperature; `t_avg` is NaN when it cannot be computed. Use the
/// accessors or [`Stats::panel`] rather than printing the raw floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub t_avg: f64,
    pub t_max: f64,
    pub t_min: f64,
}

impl Stats {
    pub fn empty() -> Self {
        Self {
            count: 0,
            t_avg: f64::NAN,
            t_max: f64::NEG_INFINITY,
            t_min: f64::INFINITY,
        }
    }

    pub fn max(&self) -> Option<f64> {
        finite(self.t_max)
    }

    pub fn min(&self) -> Option<f64> {
        finite(self.t_min)
    }

    pub fn avg(&self) -> Option<f64> {
        finite(self.t_avg)
    }

    /// Display strings for the status panel.
    pub fn panel(&self) -> StatsPanel {
        StatsPanel {
            count: self.count.to_string(),
            t_max: self.max().map_or_else(not_available, |v| format!("{} °C", v)),
            t_min: self.min().map_or_else(not_available, |v| format!("{} °C", v)),
            t_avg: self
                .avg()
                .map_or_else(not_available, |v| format!("{:.2} °C", v)),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::empty()
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Status panel text, one string per figure.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatsPanel {
    /// Number of points on the map
    pub count: String,
    /// Highest temperature, e.g. "30 °C" or "N/A"
    pub t_max: String,
    /// Lowest temperature, e.g. "10 °C" or "N/A"
    pub t_min: String,
    /// Average temperature with two decimals, or "N/A"
    pub t_avg: String,
}

/// Compute count, average, maximum and minimum temperature.
///
/// The average divides by the number of points, including points that have
/// no temperature. With no finite temperature at all the average is NaN.
pub fn aggregate(points: &[LocatedPoint<'_>]) -> Stats {
    let mut stats = Stats {
        count: points.len(),
        ..Stats::empty()
    };
    if points.is_empty() {
        return stats;
    }

    let mut sum = 0.0;
    let mut seen = 0usize;
    for t in points.iter().filter_map(|p| p.temperature()) {
        sum += t;
        seen += 1;
        stats.t_max = stats.t_max.max(t);
        stats.t_min = stats.t_min.min(t);
    }

    if seen > 0 {
        stats.t_avg = sum / stats.count as f64;
    }
    stats
}

/// Lowest and highest finite temperature, as `(t_min, t_max)` with the same
/// sentinels as [`Stats`].
pub fn temperature_range(points: &[LocatedPoint<'_>]) -> (f64, f64) {
    points
        .iter()
        .filter_map(|p| p.temperature())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::markers::locate_all;
    use crate::store::models::{GeoPoint, WeatherPoint};

    fn point(id: &str, temperature: Option<f64>) -> WeatherPoint {
        WeatherPoint {
            id: id.to_string(),
            geopoint: Some(GeoPoint::new(45.0, 9.0)),
            description: None,
            temperature,
            humidity: None,
            precipitation: None,
        }
    }

    #[test]
    fn test_aggregate_bounds_hold() {
        let points = vec![
            point("a", Some(10.0)),
            point("b", Some(-4.5)),
            point("c", Some(30.0)),
        ];
        let located = locate_all(&points);
        let stats = aggregate(&located);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.t_max, 30.0);
        assert_eq!(stats.t_min, -4.5);
        for p in &points {
            let t = p.temperature.unwrap();
            assert!(stats.t_max >= t && stats.t_min <= t);
        }
        assert!((stats.t_avg - 35.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_divides_by_full_count() {
        let points = vec![point("a", Some(10.0)), point("b", None)];
        let stats = aggregate(&locate_all(&points));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg(), Some(5.0));
    }

    #[test]
    fn test_aggregate_no_finite_temperature() {
        let points = vec![point("a", None), point("b", None)];
        let stats = aggregate(&locate_all(&points));

        assert_eq!(stats.count, 2);
        assert_eq!(stats.t_max, f64::NEG_INFINITY);
        assert_eq!(stats.t_min, f64::INFINITY);
        let panel = stats.panel();
        assert_eq!(panel.t_max, "N/A");
        assert_eq!(panel.t_min, "N/A");
        assert_eq!(panel.t_avg, "N/A");
    }

    #[test]
    fn test_aggregate_empty() {
        let stats = aggregate(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.avg().is_none());

        let panel = stats.panel();
        assert_eq!(panel.count, "0");
        assert_eq!(panel.t_avg, "N/A");
        assert!(!panel.t_avg.contains("NaN"));
    }

    #[test]
    fn test_zero_temperature_counts() {
        let points = vec![point("a", Some(0.0))];
        let stats = aggregate(&locate_all(&points));
        assert_eq!(stats.max(), Some(0.0));
        assert_eq!(stats.min(), Some(0.0));
        assert_eq!(stats.panel().t_avg, "0.00 °C");
    }

    #[test]
    fn test_panel_formatting() {
        let points = vec![point("a", Some(10.0)), point("b", Some(21.5))];
        let panel = aggregate(&locate_all(&points)).panel();
        assert_eq!(panel.count, "2");
        assert_eq!(panel.t_max, "21.5 °C");
        assert_eq!(panel.t_min, "10 °C");
        assert_eq!(panel.t_avg, "15.75 °C");
    }

    #[test]
    fn test_temperature_range() {
        let points = vec![point("a", Some(3.0)), point("b", None), point("c", Some(-1.0))];
        assert_eq!(temperature_range(&locate_all(&points)), (-1.0, 3.0));
        assert_eq!(temperature_range(&[]), (f64::INFINITY, f64::NEG_INFINITY));
    }
}
