//! Open-Meteo current-weather client.
//!
//! Fetches the current temperature, humidity and precipitation for a location.
//! See: https://open-meteo.com/en/docs

use std::time::Duration;

use serde::Deserialize;

use crate::errors::AppError;
use crate::helpers::deserialize_lenient_f64;

/// Variables requested in the `current` block.
const CURRENT_VARIABLES: &str = "temperature_2m,relative_humidity_2m,precipitation";

/// Client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

/// Current readings as returned by the provider. Each field is `None` when the
/// provider left it out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentReadings {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
}

// --- Open-Meteo JSON response types ---

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    current: Option<OpenMeteoCurrent>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    temperature_2m: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    relative_humidity_2m: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    precipitation: Option<f64>,
}

impl From<OpenMeteoResponse> for CurrentReadings {
    fn from(r: OpenMeteoResponse) -> Self {
        match r.current {
            Some(c) => Self {
                temperature: c.temperature_2m,
                humidity: c.relative_humidity_2m,
                precipitation: c.precipitation,
            },
            None => Self::default(),
        }
    }
}

impl OpenMeteoClient {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the current readings at a location.
    ///
    /// Any transport failure, non-success status or undecodable body is an
    /// `ExternalServiceError`; callers treat it as "no data".
    pub async fn current(&self, lat: f64, lon: f64) -> Result<CurrentReadings, AppError> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", CURRENT_VARIABLES.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Open-Meteo request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Open-Meteo returned HTTP {}",
                response.status()
            )));
        }

        let body: OpenMeteoResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Open-Meteo JSON parse error: {}", e))
        })?;

        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(&server.uri(), "WeatherMapTest/1.0", None).unwrap()
    }

    #[test]
    fn test_missing_current_block_is_empty() {
        let r: OpenMeteoResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(CurrentReadings::from(r), CurrentReadings::default());
    }

    #[test]
    fn test_partial_current_block() {
        let r: OpenMeteoResponse = serde_json::from_value(serde_json::json!({
            "current": { "time": "2026-01-15T12:00", "relative_humidity_2m": 80 }
        }))
        .unwrap();
        let readings = CurrentReadings::from(r);
        assert_eq!(readings.temperature, None);
        assert_eq!(readings.humidity, Some(80.0));
        assert_eq!(readings.precipitation, None);
    }

    #[tokio::test]
    async fn test_current_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("latitude", "45.42"))
            .and(query_param("longitude", "10.08"))
            .and(query_param("current", CURRENT_VARIABLES))
            .and(header("user-agent", "WeatherMapTest/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 45.42,
                "longitude": 10.08,
                "current": {
                    "time": "2026-01-15T12:00",
                    "temperature_2m": 5.5,
                    "relative_humidity_2m": 75,
                    "precipitation": 0.2
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let readings = client(&server).current(45.42, 10.08).await.unwrap();
        assert_eq!(readings.temperature, Some(5.5));
        assert_eq!(readings.humidity, Some(75.0));
        assert_eq!(readings.precipitation, Some(0.2));
    }

    #[tokio::test]
    async fn test_current_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).current(1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_current_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(client(&server).current(1.0, 2.0).await.is_err());
    }
}
