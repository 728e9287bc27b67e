// ============================================================================
// Module: models
// ============================================================================
// Data structures of the dashboard: catalog records, normalized price
// series, and open-widget state.
// ============================================================================

pub mod commodity;
pub mod series;
pub mod widget;

pub use commodity::CommodityRecord;
pub use series::{NormalizedSeries, SeriesPoint};
pub use widget::{WidgetAction, WidgetRegistry, WidgetState};
