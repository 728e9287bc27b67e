// ============================================================================
// API client: price-series provider + Series Normalizer
// ============================================================================
// Queries the provider by upper-cased commodity name and turns the raw
// payload into a NormalizedSeries. Normalization policy:
//
//   1. An explicit error indicator fails with ProviderError immediately,
//      before any entry is examined.
//   2. Entries whose value fails numeric coercion (or whose date does not
//      parse) are dropped, not fatal.
//   3. Survivors are sorted ascending by date, oldest first.
//   4. An empty surviving sequence fails with EmptySeries; the chart never
//      receives an empty series.
// ============================================================================

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{DashError, Result};
use crate::models::{NormalizedSeries, SeriesPoint};

/// Raw provider payload. Success carries `data`; failure carries the
/// explicit `Error Message` indicator. Anything else is malformed.
#[derive(Debug, Deserialize)]
pub struct RawSeriesPayload {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    pub data: Option<Vec<RawEntry>>,
}

/// One raw time-series entry. `value` stays a JSON value until coercion:
/// the provider serves both native numbers and numeric strings.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    pub date: String,
    pub value: Value,
}

/// Key of the API credential in the environment.
pub const API_KEY_ENV: &str = "COMMODITY_API_KEY";

/// Resolves the provider credential; the provider's public demo key is the
/// fallback. Opaque string, not validated here.
pub fn api_key() -> String {
    std::env::var(API_KEY_ENV).unwrap_or_else(|_| "demo".to_string())
}

/// Fetches the raw monthly series for one commodity. A single attempt, no
/// retry; every failure surfaces to the caller.
#[instrument(skip(key))]
pub async fn fetch_series(provider_key: &str, key: &str) -> Result<RawSeriesPayload> {
    let url = build_provider_url(provider_key, key);
    debug!("Requesting price series");

    let client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()?;

    let response = client.get(&url).send().await?;

    let status = response.status();
    debug!(status = %status, "Received provider response");
    if !status.is_success() {
        return Err(DashError::ProviderError(format!("HTTP {status}")));
    }

    let payload: RawSeriesPayload = response
        .json()
        .await
        .map_err(|e| DashError::ProviderError(format!("unreadable payload: {e}")))?;

    Ok(payload)
}

fn build_provider_url(provider_key: &str, key: &str) -> String {
    format!(
        "https://www.alphavantage.co/query?function={}&interval=monthly&apikey={}",
        provider_key, key
    )
}

/// Normalizes a raw payload into a plot-ready series for `commodity_id`.
#[instrument(skip(payload))]
pub fn normalize(
    commodity_id: u32,
    label: &str,
    payload: RawSeriesPayload,
) -> Result<NormalizedSeries> {
    // Explicit error indicator wins before any entry is looked at.
    if let Some(message) = payload.error_message {
        return Err(DashError::ProviderError(message));
    }

    let entries = payload
        .data
        .ok_or_else(|| DashError::ProviderError("unexpected payload shape".to_string()))?;

    let total = entries.len();
    let mut points = Vec::with_capacity(total);
    let mut dropped = 0usize;

    for entry in entries {
        match (parse_entry_date(&entry.date), coerce_value(&entry.value)) {
            (Some(date), Some(value)) => points.push(SeriesPoint::new(date, value)),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, total, "Dropped malformed series entries");
    }

    if points.is_empty() {
        return Err(DashError::EmptySeries);
    }

    info!(points = points.len(), "Series normalized");
    Ok(NormalizedSeries::new(commodity_id, label.to_string(), points))
}

/// Coerces a raw entry value to a finite number. Native numbers and numeric
/// strings both pass; everything else is malformed.
fn coerce_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Parses an entry date at day resolution. The provider's monthly shape
/// (`2024-01`) is accepted as the first of the month.
fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(entries: Value) -> RawSeriesPayload {
        serde_json::from_value(json!({ "data": entries })).unwrap()
    }

    #[test]
    fn test_build_provider_url() {
        let url = build_provider_url("WHEAT", "demo");
        assert!(url.contains("function=WHEAT"));
        assert!(url.contains("interval=monthly"));
        assert!(url.contains("apikey=demo"));
    }

    #[test]
    fn test_normalize_all_numeric_keeps_every_entry_sorted() {
        let raw = payload(json!([
            {"date": "2024-03-31", "value": 3.0},
            {"date": "2024-01-31", "value": "1.5"},
            {"date": "2024-02-29", "value": 2.25},
        ]));

        let series = normalize(1, "Gold", raw).unwrap();
        assert_eq!(series.len(), 3);
        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.5, 2.25, 3.0]);
        assert!(series
            .points
            .windows(2)
            .all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_normalize_drops_non_numeric_values() {
        let raw = payload(json!([
            {"date": "2024-01", "value": "100"},
            {"date": "2023-01", "value": "bad"},
        ]));

        let series = normalize(1, "Gold", raw).unwrap();
        assert_eq!(series.len(), 1);
        let point = &series.points[0];
        assert_eq!(point.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(point.value, 100.0);
    }

    #[test]
    fn test_normalize_error_indicator_wins_over_entries() {
        let raw: RawSeriesPayload = serde_json::from_value(json!({
            "Error Message": "Invalid API call",
            "data": [{"date": "2024-01-31", "value": 100.0}],
        }))
        .unwrap();

        let result = normalize(1, "Gold", raw);
        match result {
            Err(DashError::ProviderError(msg)) => assert_eq!(msg, "Invalid API call"),
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_empty_entries_is_empty_series() {
        let raw = payload(json!([]));
        assert!(matches!(
            normalize(1, "Gold", raw),
            Err(DashError::EmptySeries)
        ));
    }

    #[test]
    fn test_normalize_all_malformed_is_empty_series() {
        let raw = payload(json!([
            {"date": "2024-01-31", "value": "n/a"},
            {"date": "not a date", "value": 4.2},
            {"date": "2024-02-29", "value": null},
        ]));

        assert!(matches!(
            normalize(1, "Gold", raw),
            Err(DashError::EmptySeries)
        ));
    }

    #[test]
    fn test_normalize_missing_data_field_is_provider_error() {
        let raw: RawSeriesPayload = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            normalize(1, "Gold", raw),
            Err(DashError::ProviderError(_))
        ));
    }

    #[test]
    fn test_coerce_value_rejects_non_finite() {
        assert_eq!(coerce_value(&json!("inf")), None);
        assert_eq!(coerce_value(&json!("NaN")), None);
        assert_eq!(coerce_value(&json!(true)), None);
        assert_eq!(coerce_value(&json!("  42.5 ")), Some(42.5));
        assert_eq!(coerce_value(&json!(7)), Some(7.0));
    }

    #[test]
    fn test_parse_entry_date_accepts_monthly_shape() {
        assert_eq!(
            parse_entry_date("2024-01"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            parse_entry_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_entry_date("January 2024"), None);
    }
}
