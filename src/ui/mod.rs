// ============================================================================
// Module: ui
// ============================================================================
// Terminal rendering and input. Pure state lives in app/models/chart; this
// module only reads it.
// ============================================================================

pub mod chart;
pub mod dashboard;
pub mod events;

pub use dashboard::render;
pub use events::{Event, EventHandler};
