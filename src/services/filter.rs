//! Client-side point filtering.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::markers::LocatedPoint;
use crate::store::models::WeatherPoint;

/// Filter inputs. All fields optional; an empty criteria matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the description; empty means no text filter
    pub text: String,
    /// Inclusive lower temperature bound
    pub min: Option<f64>,
    /// Inclusive upper temperature bound
    pub max: Option<f64>,
}

impl FilterCriteria {
    /// Trim and lowercase the text; drop non-finite bounds.
    pub fn normalized(self) -> Self {
        Self {
            text: self.text.trim().to_lowercase(),
            min: self.min.filter(|v| v.is_finite()),
            max: self.max.filter(|v| v.is_finite()),
        }
    }

    /// Whether a point passes every active constraint. Expects normalized
    /// criteria. A point without a temperature fails any active bound.
    pub fn matches(&self, point: &WeatherPoint) -> bool {
        if !self.text.is_empty() {
            let desc = point.description.as_deref().unwrap_or("").to_lowercase();
            if !desc.contains(&self.text) {
                return false;
            }
        }

        if self.min.is_none() && self.max.is_none() {
            return true;
        }

        let Some(t) = point.temperature.filter(|t| t.is_finite()) else {
            return false;
        };
        self.min.map_or(true, |min| t >= min) && self.max.map_or(true, |max| t <= max)
    }
}

/// Matching points, in their original order.
pub fn filter_points<'a>(
    points: &[LocatedPoint<'a>],
    criteria: &FilterCriteria,
) -> Vec<LocatedPoint<'a>> {
    points
        .iter()
        .filter(|p| criteria.matches(p.point))
        .copied()
        .collect()
}

/// Result line shown next to the filter controls.
pub fn results_text(n: usize) -> String {
    format!("Results: {}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::markers::locate_all;
    use crate::store::models::GeoPoint;

    fn point(id: &str, desc: &str, temperature: Option<f64>) -> WeatherPoint {
        WeatherPoint {
            id: id.to_string(),
            geopoint: Some(GeoPoint::new(41.0, 12.0)),
            description: Some(desc.to_string()),
            temperature,
            humidity: None,
            precipitation: None,
        }
    }

    fn sample() -> Vec<WeatherPoint> {
        vec![
            point("A", "Milano", Some(10.0)),
            point("B", "Roma", Some(30.0)),
            point("C", "Napoli", None),
        ]
    }

    fn ids(points: &[WeatherPoint], criteria: FilterCriteria) -> Vec<String> {
        let located = locate_all(points);
        filter_points(&located, &criteria.normalized())
            .iter()
            .map(|p| p.point.id.clone())
            .collect()
    }

    #[test]
    fn test_text_filter() {
        let criteria = FilterCriteria {
            text: "mil".into(),
            ..Default::default()
        };
        assert_eq!(ids(&sample(), criteria), vec!["A"]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_and_trimmed() {
        let criteria = FilterCriteria {
            text: "  ROM ".into(),
            ..Default::default()
        };
        assert_eq!(ids(&sample(), criteria), vec!["B"]);
    }

    #[test]
    fn test_min_filter_excludes_missing_temperature() {
        let criteria = FilterCriteria {
            min: Some(15.0),
            ..Default::default()
        };
        assert_eq!(ids(&sample(), criteria), vec!["B"]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let criteria = FilterCriteria {
            min: Some(10.0),
            max: Some(30.0),
            ..Default::default()
        };
        assert_eq!(ids(&sample(), criteria), vec!["A", "B"]);
    }

    #[test]
    fn test_no_criteria_matches_all() {
        assert_eq!(ids(&sample(), FilterCriteria::default()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_description_fails_text_filter() {
        let mut p = point("D", "", Some(5.0));
        p.description = None;
        let criteria = FilterCriteria {
            text: "a".into(),
            ..Default::default()
        }
        .normalized();
        assert!(!criteria.matches(&p));
        assert!(FilterCriteria::default().matches(&p));
    }

    #[test]
    fn test_normalized_drops_non_finite_bounds() {
        let c = FilterCriteria {
            text: " X ".into(),
            min: Some(f64::NAN),
            max: Some(3.0),
        }
        .normalized();
        assert_eq!(c.text, "x");
        assert_eq!(c.min, None);
        assert_eq!(c.max, Some(3.0));
    }

    #[test]
    fn test_results_text() {
        assert_eq!(results_text(0), "Results: 0");
        assert_eq!(results_text(12), "Results: 12");
    }
}
