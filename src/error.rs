// ============================================================================
// Error taxonomy
// ============================================================================
// Every failure the dashboard core can produce. Nothing here is fatal: the
// controller catches all of these at its boundary and either absorbs them
// (AlreadyOpen) or turns them into a status-line message.
// ============================================================================

use thiserror::Error;

/// Failures produced by the dashboard core.
#[derive(Error, Debug)]
pub enum DashError {
    /// The catalog source failed or returned something that is not a list of
    /// commodity records. The catalog stays empty.
    #[error("commodity catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The price-series source reported an explicit error. Surfaced to the
    /// user verbatim.
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Normalization produced zero usable points.
    #[error("no data available")]
    EmptySeries,

    /// A widget for this commodity is already open. Absorbed silently by the
    /// controller; opening twice is idempotent from the user's perspective.
    #[error("widget already open for commodity {0}")]
    AlreadyOpen(u32),

    /// Compare was requested while no primary series is charted.
    #[error("no active chart: show a graph first, then compare")]
    NoActiveChart,

    /// Transport-level HTTP failure talking to the price-series source.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;
