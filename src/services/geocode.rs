//! Reverse geocoding: coordinates to a place name.
//!
//! Uses Nominatim (OpenStreetMap). The usage policy requires an identifying
//! User-Agent on every request.

use std::time::Duration;

use serde::Deserialize;

use crate::errors::AppError;

/// Label used when the provider answers but names nothing.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Client for the Nominatim reverse endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

/// The two naming fields we read from a reverse lookup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReverseGeocode {
    /// Short name of the place (e.g. "Milano")
    #[serde(default)]
    pub name: Option<String>,
    /// Full address line
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ReverseGeocode {
    /// Short name, then long name, then [`UNKNOWN_PLACE`]. Blank strings are skipped.
    pub fn place_label(&self) -> String {
        [self.name.as_deref(), self.display_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_PLACE)
            .to_string()
    }
}

impl NominatimClient {
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

    /// Look up the place at a coordinate.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<ReverseGeocode, AppError> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Nominatim returned HTTP {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Nominatim JSON parse error: {}", e))
        })
    }
}
