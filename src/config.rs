use crate::errors::AppError;

const DEFAULT_POCKETBASE_URL: &str = "http://127.0.0.1:8090";
const DEFAULT_COLLECTION: &str = "weather_points";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1";
const DEFAULT_USER_AGENT: &str = "WeatherMap/0.1 (weather-map-api)";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the PocketBase instance holding the points.
    pub pocketbase_url: String,
    /// PocketBase collection name.
    pub collection: String,
    pub nominatim_url: String,
    pub open_meteo_url: String,
    /// Sent on every outbound request (Nominatim rejects anonymous clients).
    pub user_agent: String,
    /// Optional timeout for outbound requests. `None` leaves reqwest's defaults.
    pub request_timeout_secs: Option<u64>,
    /// How many points are enriched at once during a sync pass.
    pub enrich_concurrency: usize,
    /// Periodic sync interval; 0 disables the periodic pass.
    pub sync_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let enrich_concurrency: usize = parse_var(&lookup, "ENRICH_CONCURRENCY", 1)?;
        if enrich_concurrency == 0 {
            return Err(AppError::Config(
                "ENRICH_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) if !v.trim().is_empty() => Some(v.trim().parse().map_err(|_| {
                AppError::Config(format!("REQUEST_TIMEOUT_SECS must be a number, got '{}'", v))
            })?),
            _ => None,
        };

        Ok(Self {
            port: parse_var(&lookup, "PORT", 8080)?,
            pocketbase_url: trim_slash(get("POCKETBASE_URL", DEFAULT_POCKETBASE_URL)),
            collection: get("POCKETBASE_COLLECTION", DEFAULT_COLLECTION),
            nominatim_url: trim_slash(get("NOMINATIM_URL", DEFAULT_NOMINATIM_URL)),
            open_meteo_url: trim_slash(get("OPEN_METEO_URL", DEFAULT_OPEN_METEO_URL)),
            user_agent: get("HTTP_USER_AGENT", DEFAULT_USER_AGENT),
            request_timeout_secs,
            enrich_concurrency,
            sync_interval_secs: parse_var(&lookup, "SYNC_INTERVAL_SECS", 0)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value '{}'", key, v))),
        _ => Ok(default),
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.pocketbase_url, "http://127.0.0.1:8090");
        assert_eq!(config.collection, "weather_points");
        assert!(config.user_agent.contains("WeatherMap"));
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.enrich_concurrency, 1);
        assert_eq!(config.sync_interval_secs, 0);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("POCKETBASE_URL", "http://pb.local:8090/"),
            ("POCKETBASE_COLLECTION", "prova"),
            ("ENRICH_CONCURRENCY", "2"),
            ("REQUEST_TIMEOUT_SECS", "15"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.pocketbase_url, "http://pb.local:8090");
        assert_eq!(config.collection, "prova");
        assert_eq!(config.enrich_concurrency, 2);
        assert_eq!(config.request_timeout_secs, Some(15));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = config_from(&[("ENRICH_CONCURRENCY", "0")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
