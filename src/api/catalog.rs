// ============================================================================
// API client: commodity catalog
// ============================================================================
// One read at startup returning the full commodity list. Any failure along
// the way (transport, non-2xx status, payload that is not a list of records)
// collapses into CatalogUnavailable: the catalog stays empty and the
// selection panel simply shows no options.
// ============================================================================

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{DashError, Result};
use crate::models::CommodityRecord;

/// Catalog endpoint used when `COMMODITY_CATALOG_URL` is not set.
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8000/dbconnect.php";

/// Resolves the catalog endpoint from the environment.
pub fn catalog_url() -> String {
    std::env::var("COMMODITY_CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string())
}

/// Fetches the catalog once and returns it sorted ascending by display name.
#[instrument]
pub async fn fetch_catalog(url: &str) -> Result<Vec<CommodityRecord>> {
    debug!("Requesting commodity catalog");
    let response = reqwest::get(url)
        .await
        .map_err(|e| DashError::CatalogUnavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = %status, "Catalog source returned error status");
        return Err(DashError::CatalogUnavailable(format!("HTTP {status}")));
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| DashError::CatalogUnavailable(e.to_string()))?;

    let records = parse_catalog(payload)?;
    info!(count = records.len(), "Catalog loaded");
    Ok(records)
}

/// Validates the payload shape and sorts the records.
fn parse_catalog(payload: Value) -> Result<Vec<CommodityRecord>> {
    if !payload.is_array() {
        return Err(DashError::CatalogUnavailable(
            "catalog payload is not a list".to_string(),
        ));
    }

    let mut records: Vec<CommodityRecord> = serde_json::from_value(payload)
        .map_err(|e| DashError::CatalogUnavailable(format!("bad record shape: {e}")))?;

    sort_by_name(&mut records);
    Ok(records)
}

/// Sorts ascending by display name, case- and accent-width-insensitively
/// (Unicode lowercase), with byte order as tiebreak for stability.
pub fn sort_by_name(records: &mut [CommodityRecord]) {
    records.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

// ============================================================================
// Tests
// ============================================================================
