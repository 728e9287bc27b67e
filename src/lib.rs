// ============================================================================
// commodity-dash - Library
// ============================================================================
// Exposes the modules for the binary and for tests.
// ============================================================================

pub mod api;    // catalog + price-series clients, series normalizer
pub mod app;    // dashboard controller state
pub mod chart;  // chart overlay manager
pub mod error;  // failure taxonomy
pub mod models; // data structures
pub mod ui;     // terminal rendering and input
