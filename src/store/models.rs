use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::helpers::{deserialize_lenient_f64, deserialize_or_none};

/// Coordinates of a point. Either half may be missing in a malformed record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// Latitude (WGS84)
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub lat: Option<f64>,
    /// Longitude (WGS84)
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub lon: Option<f64>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }
}

/// A weather-tagged point as stored in the PocketBase collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherPoint {
    /// Store-assigned record id
    pub id: String,
    /// Point coordinates; points without both halves are never rendered.
    /// A value that is not an object reads as missing.
    #[serde(default, deserialize_with = "deserialize_or_none")]
    pub geopoint: Option<GeoPoint>,
    /// Place name; empty means the point still needs reverse geocoding
    #[serde(default, deserialize_with = "deserialize_or_none")]
    pub description: Option<String>,
    /// Air temperature in °C
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub temperature: Option<f64>,
    /// Relative humidity in %
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub humidity: Option<f64>,
    /// Precipitation in mm
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub precipitation: Option<f64>,
}

impl WeatherPoint {
    /// Both coordinates, when present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let gp = self.geopoint?;
        match (gp.lat, gp.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// True when the description is absent or blank.
    pub fn needs_description(&self) -> bool {
        self.description
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
    }

    /// The fields this service is allowed to write back.
    pub fn fields(&self) -> PointFields {
        PointFields {
            description: self.description.clone(),
            temperature: self.temperature,
            humidity: self.humidity,
            precipitation: self.precipitation,
        }
    }
}

/// Update payload. `None` fields are omitted so the store keeps its value;
/// coordinates are not part of it because they never change after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}

/// Create payload for a bare point placed by a map click.
#[derive(Debug, Clone, Serialize)]
pub struct NewPoint {
    pub geopoint: GeoPoint,
    pub description: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
}

impl NewPoint {
    pub fn bare(lat: f64, lon: f64) -> Self {
        Self {
            geopoint: GeoPoint::new(lat, lon),
            description: String::new(),
            temperature: None,
            humidity: None,
            precipitation: None,
        }
    }
}

/// One page of records from the PocketBase list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<WeatherPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = serde_json::json!({
            "id": "abc123",
            "collectionName": "weather_points",
            "geopoint": { "lat": 45.42, "lon": 10.08 },
            "description": "Milano",
            "temperature": 10.5,
            "humidity": 70,
            "precipitation": 0,
            "created": "2026-01-01 10:00:00.000Z"
        });
        let p: WeatherPoint = serde_json::from_value(json).unwrap();
        assert_eq!(p.id, "abc123");
        assert_eq!(p.coordinates(), Some((45.42, 10.08)));
        assert_eq!(p.temperature, Some(10.5));
        assert_eq!(p.humidity, Some(70.0));
        assert_eq!(p.precipitation, Some(0.0));
        assert!(!p.needs_description());
    }

    #[test]
    fn test_parse_bare_record() {
        let json = serde_json::json!({
            "id": "new1",
            "geopoint": { "lat": 1.0, "lon": 2.0 },
            "description": "",
            "temperature": null,
        });
        let p: WeatherPoint = serde_json::from_value(json).unwrap();
        assert!(p.needs_description());
        assert_eq!(p.temperature, None);
        assert_eq!(p.humidity, None);
    }

    #[test]
    fn test_missing_coordinates() {
        let no_geo: WeatherPoint = serde_json::from_value(serde_json::json!({"id": "a"})).unwrap();
        assert_eq!(no_geo.coordinates(), None);

        let half: WeatherPoint =
            serde_json::from_value(serde_json::json!({"id": "b", "geopoint": {"lat": 3.0}}))
                .unwrap();
        assert_eq!(half.coordinates(), None);
    }

    #[test]
    fn test_malformed_geopoint_reads_as_missing() {
        for bad in [
            serde_json::json!(""),
            serde_json::json!("45,9"),
            serde_json::json!(12),
            serde_json::json!(true),
        ] {
            let p: WeatherPoint =
                serde_json::from_value(serde_json::json!({"id": "m", "geopoint": bad})).unwrap();
            assert_eq!(p.geopoint, None);
            assert_eq!(p.coordinates(), None);
        }
    }

    #[test]
    fn test_non_string_description_needs_enrichment() {
        let p: WeatherPoint =
            serde_json::from_value(serde_json::json!({"id": "a", "description": 42})).unwrap();
        assert_eq!(p.description, None);
        assert!(p.needs_description());
    }

    #[test]
    fn test_page_survives_malformed_record() {
        let json = serde_json::json!({
            "page": 1, "perPage": 200, "totalItems": 2, "totalPages": 1,
            "items": [
                { "id": "good", "geopoint": {"lat": 45.0, "lon": 9.0}, "description": "Milano", "temperature": 10 },
                { "id": "bad", "geopoint": "", "description": {"text": "x"}, "temperature": "warm" }
            ]
        });
        let page: RecordPage = serde_json::from_value(json).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].coordinates(), Some((45.0, 9.0)));
        assert_eq!(page.items[1].id, "bad");
        assert_eq!(page.items[1].geopoint, None);
        assert_eq!(page.items[1].description, None);
        assert_eq!(page.items[1].temperature, None);
    }

    #[test]
    fn test_blank_description_needs_enrichment() {
        let p: WeatherPoint =
            serde_json::from_value(serde_json::json!({"id": "a", "description": "   "})).unwrap();
        assert!(p.needs_description());
    }

    #[test]
    fn test_fields_omit_missing_values() {
        let fields = PointFields {
            description: Some("Roma".into()),
            temperature: Some(15.0),
            humidity: None,
            precipitation: None,
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({"description": "Roma", "temperature": 15.0}));
        assert!(json.get("geopoint").is_none());
    }

    #[test]
    fn test_bare_point_payload() {
        let json = serde_json::to_value(NewPoint::bare(45.0, 9.0)).unwrap();
        assert_eq!(json["geopoint"], serde_json::json!({"lat": 45.0, "lon": 9.0}));
        assert_eq!(json["description"], "");
        assert!(json["temperature"].is_null());
    }

    #[test]
    fn test_record_page() {
        let json = serde_json::json!({
            "page": 1, "perPage": 200, "totalItems": 1, "totalPages": 1,
            "items": [{ "id": "x", "geopoint": {"lat": 0.5, "lon": 0.5} }]
        });
        let page: RecordPage = serde_json::from_value(json).unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items.len(), 1);
    }
}
