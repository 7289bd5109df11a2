//! Shared helpers for reading and printing weather numbers.
//!
//! Store records are loosely typed: a reading may arrive as a JSON number, a
//! numeric string, an empty string or `null`. Everything funnels through
//! [`finite`] so that only finite values survive. A missing reading stays
//! `None` and is never turned into zero.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Literal shown wherever a number is absent or not finite.
pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Keep a value only if it is finite.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Parse a number out of free text. Empty or non-numeric text yields `None`.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().and_then(finite)
}

/// Serde adapter for optional readings: accepts numbers, numeric strings,
/// `null` and anything else (which becomes `None`).
///
/// Use together with `#[serde(default)]` so a missing key is also `None`.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        #[allow(dead_code)]
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(v)) => finite(v),
        Some(Raw::Text(s)) => parse_number(&s),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Serde adapter for loosely typed record fields: a value of the wrong shape
/// (a string where an object belongs, a number where text belongs) becomes
/// `None` instead of failing the whole record.
///
/// Use together with `#[serde(default)]` so a missing key is also `None`.
pub(crate) fn deserialize_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

/// Format an optional reading for display, `"N/A"` when absent.
pub(crate) fn format_reading(v: Option<f64>) -> String {
    match v.and_then(finite) {
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Minimal HTML escaping for text placed inside popup markup.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
