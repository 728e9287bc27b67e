// ============================================================================
// Module: api
// ============================================================================
// Clients for the two external data sources: the commodity catalog and the
// price-series provider (plus the normalizer for its payload).
// ============================================================================

pub mod catalog;
pub mod provider;

pub use catalog::fetch_catalog;
pub use provider::{fetch_series, normalize, RawSeriesPayload};
