// ============================================================================
// App: Dashboard Controller
// ============================================================================
// Central application state and the only place that touches both the data
// sources and the rendering state. UI events and completed fetches are
// applied one at a time, each as a single atomic step, so the widget
// registry and the chart state are never mutated by two steps concurrently.
//
// Fetches themselves run on the background worker (main.rs); the controller
// only issues FetchRequest values and later applies the completions against
// chart state as it exists at completion time. In-flight fetches are not
// cancelled: a stale show-graph completion on an empty chart becomes a fresh
// primary, a stale compare completion with no primary surfaces NoActiveChart
// and is discarded.
// ============================================================================

use tracing::{debug, info};

use crate::api::provider::{self, RawSeriesPayload};
use crate::chart::ChartOverlay;
use crate::error::DashError;
use crate::models::{CommodityRecord, WidgetAction, WidgetRegistry};

/// Which panel currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Catalog,
    Widgets,
}

/// What a completed fetch should do to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchIntent {
    /// Replace the chart with this commodity as the new primary.
    ShowGraph,

    /// Overlay this commodity on the existing chart.
    Compare,
}

/// A fetch the event loop should hand to the background worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub commodity_id: u32,
    pub provider_key: String,
    pub label: String,
    pub intent: FetchIntent,
}

/// Dashboard state. Owns the catalog, the widget registry and the chart
/// overlay manager exclusively.
pub struct App {
    pub running: bool,

    /// Catalog records in display order (sorted by name at load time).
    pub catalog: Vec<CommodityRecord>,

    /// Cursor into the catalog panel.
    pub catalog_index: usize,

    /// Cursor into the widget panel.
    pub widget_index: usize,

    pub focus: Panel,

    pub registry: WidgetRegistry,

    pub chart: ChartOverlay,

    /// Transient user-facing message (errors, guidance). Replaced by the
    /// next event that produces one.
    pub status: Option<String>,

    /// True while the worker has a fetch outstanding.
    pub is_loading: bool,
    pub loading_message: Option<String>,

    /// Two-step quit: first 'q' arms, second 'q' quits.
    pub confirm_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            catalog: Vec::new(),
            catalog_index: 0,
            widget_index: 0,
            focus: Panel::Catalog,
            registry: WidgetRegistry::new(),
            chart: ChartOverlay::new(),
            status: None,
            is_loading: false,
            loading_message: None,
            confirm_quit: false,
        }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Stores the loaded catalog. Records arrive already sorted by name.
    pub fn catalog_loaded(&mut self, records: Vec<CommodityRecord>) {
        info!(count = records.len(), "Catalog loaded into dashboard");
        self.catalog = records;
        self.catalog_index = 0;
    }

    /// Pure lookup against the loaded catalog.
    pub fn find_commodity(&self, id: u32) -> Option<&CommodityRecord> {
        self.catalog.iter().find(|c| c.id == id)
    }

    pub fn selected_catalog_record(&self) -> Option<&CommodityRecord> {
        self.catalog.get(self.catalog_index)
    }

    // ========================================================================
    // UI events
    // ========================================================================

    /// The user picked a commodity from the catalog panel.
    ///
    /// Unknown ids are ignored; picking an already-open commodity is
    /// idempotent (the AlreadyOpen failure is absorbed, not surfaced).
    pub fn selection_made(&mut self, id: u32) {
        let record = match self.find_commodity(id) {
            Some(record) => record.clone(),
            None => {
                debug!(id, "Selection for unknown commodity ignored");
                return;
            }
        };

        match self.registry.open(record) {
            Ok(()) => info!(id, "Widget opened"),
            Err(DashError::AlreadyOpen(_)) => debug!(id, "Widget already open, ignoring"),
            Err(_) => {}
        }
    }

    /// The user triggered one of a widget's affordances. Returns the fetch
    /// the event loop must dispatch, if the action needs one.
    pub fn widget_action(&mut self, id: u32, action: WidgetAction) -> Option<FetchRequest> {
        match action {
            WidgetAction::ShowGraph => self.request_series(id, FetchIntent::ShowGraph),

            WidgetAction::Compare => {
                // Gated on a primary existing; without one there is nothing
                // to overlay onto, so do not even fetch.
                if self.chart.primary_id().is_none() {
                    debug!(id, "Compare without an active chart");
                    self.status = Some(DashError::NoActiveChart.to_string());
                    return None;
                }
                self.request_series(id, FetchIntent::Compare)
            }

            WidgetAction::Remove => {
                self.remove_widget(id);
                None
            }
        }
    }

    fn request_series(&mut self, id: u32, intent: FetchIntent) -> Option<FetchRequest> {
        let record = self.find_commodity(id)?;
        Some(FetchRequest {
            commodity_id: record.id,
            provider_key: record.provider_key(),
            label: record.name.clone(),
            intent,
        })
    }

    /// Removes a widget; removing the chart's primary clears the chart as
    /// part of the same step (the two are coupled, not independent).
    fn remove_widget(&mut self, id: u32) {
        if self.registry.remove(id) {
            info!(id, "Widget removed");
        }
        if self.chart.primary_id() == Some(id) {
            self.chart.clear();
        }
        // Keep the widget cursor on a live card.
        if self.widget_index >= self.registry.len() && self.widget_index > 0 {
            self.widget_index -= 1;
        }
    }

    // ========================================================================
    // Fetch completions
    // ========================================================================

    /// Applies one completed fetch against current chart state.
    ///
    /// `outcome` is the transport result from the worker; normalization
    /// happens here so that every state change stays inside one event step.
    pub fn series_fetched(
        &mut self,
        intent: FetchIntent,
        commodity_id: u32,
        label: &str,
        outcome: Result<RawSeriesPayload, String>,
    ) {
        let payload = match outcome {
            Ok(payload) => payload,
            Err(message) => {
                self.status = Some(format!("Error fetching data: {message}"));
                return;
            }
        };

        match provider::normalize(commodity_id, label, payload) {
            Ok(series) => match intent {
                FetchIntent::ShowGraph => {
                    self.chart.show_primary(series);
                    self.status = None;
                }
                FetchIntent::Compare => {
                    if let Err(e) = self.chart.add_overlay(series) {
                        // Stale completion: the primary vanished while the
                        // fetch was in flight. Discard the series.
                        self.status = Some(e.to_string());
                    } else {
                        self.status = None;
                    }
                }
            },
            Err(DashError::EmptySeries) => {
                self.status = Some(DashError::EmptySeries.to_string());
            }
            Err(e) => {
                self.status = Some(format!("Error fetching data: {e}"));
            }
        }
    }

    // ========================================================================
    // Navigation / loop plumbing
    // ========================================================================

    pub fn navigate_up(&mut self) {
        match self.focus {
            Panel::Catalog => self.catalog_index = self.catalog_index.saturating_sub(1),
            Panel::Widgets => self.widget_index = self.widget_index.saturating_sub(1),
        }
    }

    pub fn navigate_down(&mut self) {
        match self.focus {
            Panel::Catalog => {
                let max = self.catalog.len().saturating_sub(1);
                self.catalog_index = (self.catalog_index + 1).min(max);
            }
            Panel::Widgets => {
                let max = self.registry.len().saturating_sub(1);
                self.widget_index = (self.widget_index + 1).min(max);
            }
        }
    }

    /// Tab cycles focus between the catalog and the widget panel.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Panel::Catalog => Panel::Widgets,
            Panel::Widgets => Panel::Catalog,
        };
    }

    /// Id of the widget under the cursor, if the widget panel is non-empty.
    pub fn focused_widget_id(&self) -> Option<u32> {
        self.registry.at(self.widget_index).map(|w| w.commodity_id())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartMode;
    use serde_json::json;

    fn app_with_catalog() -> App {
        let mut app = App::new();
        app.catalog_loaded(vec![
            CommodityRecord::new(1, "Gold", "XAU", "Precious metal"),
            CommodityRecord::new(2, "Oil", "WTI", "Crude oil"),
        ]);
        app
    }

    fn raw(entries: serde_json::Value) -> RawSeriesPayload {
        serde_json::from_value(json!({ "data": entries })).unwrap()
    }

    fn gold_payload() -> RawSeriesPayload {
        raw(json!([
            {"date": "2024-01", "value": "100"},
            {"date": "2023-01", "value": "bad"},
        ]))
    }

    fn oil_payload() -> RawSeriesPayload {
        raw(json!([{"date": "2024-02", "value": 80.5}]))
    }

    #[test]
    fn test_selection_made_opens_one_widget() {
        let mut app = app_with_catalog();
        app.selection_made(1);

        assert_eq!(app.registry.len(), 1);
        assert!(app.registry.is_open(1));
    }

    #[test]
    fn test_selection_made_is_idempotent() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.selection_made(1);

        assert_eq!(app.registry.len(), 1);
        // Absorbed silently, never surfaced.
        assert!(app.status.is_none());
    }

    #[test]
    fn test_selection_made_unknown_id_ignored() {
        let mut app = app_with_catalog();
        app.selection_made(42);

        assert!(app.registry.is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_show_graph_scenario_enters_single_view() {
        let mut app = app_with_catalog();
        app.selection_made(1);

        let request = app.widget_action(1, WidgetAction::ShowGraph).unwrap();
        assert_eq!(request.provider_key, "GOLD");
        assert_eq!(request.intent, FetchIntent::ShowGraph);

        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));

        assert_eq!(app.chart.mode(), ChartMode::SingleView);
        assert_eq!(app.chart.primary_id(), Some(1));

        // The "bad" entry was dropped; the surviving point is 2024-01 / 100.
        let instance = app.chart.instance().unwrap();
        assert_eq!(instance.series[0].series.len(), 1);
        assert_eq!(instance.series[0].series.points[0].value, 100.0);
    }

    #[test]
    fn test_remove_primary_widget_clears_chart() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));
        assert_eq!(app.chart.mode(), ChartMode::SingleView);

        app.widget_action(1, WidgetAction::Remove);

        assert!(!app.registry.is_open(1));
        assert_eq!(app.chart.mode(), ChartMode::Empty);
    }

    #[test]
    fn test_remove_non_primary_widget_keeps_chart() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.selection_made(2);
        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));

        app.widget_action(2, WidgetAction::Remove);

        assert_eq!(app.chart.mode(), ChartMode::SingleView);
        assert_eq!(app.chart.primary_id(), Some(1));
    }

    #[test]
    fn test_compare_without_primary_surfaces_guidance_and_skips_fetch() {
        let mut app = app_with_catalog();
        app.selection_made(2);

        let request = app.widget_action(2, WidgetAction::Compare);

        assert!(request.is_none());
        assert_eq!(app.chart.mode(), ChartMode::Empty);
        assert!(app.status.as_deref().unwrap().contains("no active chart"));
    }

    #[test]
    fn test_compare_overlays_on_existing_primary() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.selection_made(2);
        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));

        let request = app.widget_action(2, WidgetAction::Compare).unwrap();
        assert_eq!(request.intent, FetchIntent::Compare);

        app.series_fetched(FetchIntent::Compare, 2, "Oil", Ok(oil_payload()));

        assert_eq!(app.chart.mode(), ChartMode::Comparison);
        assert_eq!(app.chart.primary_id(), Some(1));
    }

    #[test]
    fn test_fetch_failure_leaves_chart_untouched() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));

        app.series_fetched(
            FetchIntent::ShowGraph,
            2,
            "Oil",
            Err("connection refused".to_string()),
        );

        assert_eq!(app.chart.primary_id(), Some(1));
        assert_eq!(
            app.status.as_deref(),
            Some("Error fetching data: connection refused")
        );
    }

    #[test]
    fn test_empty_series_surfaces_no_data_message() {
        let mut app = app_with_catalog();
        app.selection_made(1);

        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(raw(json!([]))));

        assert_eq!(app.chart.mode(), ChartMode::Empty);
        assert_eq!(app.status.as_deref(), Some("no data available"));
    }

    #[test]
    fn test_stale_compare_completion_is_discarded() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.selection_made(2);
        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));

        // Compare for Oil is issued while Gold is primary...
        let request = app.widget_action(2, WidgetAction::Compare);
        assert!(request.is_some());

        // ...but the primary's widget is removed before the fetch lands.
        app.widget_action(1, WidgetAction::Remove);
        assert_eq!(app.chart.mode(), ChartMode::Empty);

        app.series_fetched(FetchIntent::Compare, 2, "Oil", Ok(oil_payload()));

        // Discarded: no chart instance was created.
        assert_eq!(app.chart.mode(), ChartMode::Empty);
        assert!(app.status.as_deref().unwrap().contains("no active chart"));
    }

    #[test]
    fn test_stale_show_graph_completion_becomes_fresh_primary() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.series_fetched(FetchIntent::ShowGraph, 1, "Gold", Ok(gold_payload()));
        app.widget_action(1, WidgetAction::Remove);
        assert_eq!(app.chart.mode(), ChartMode::Empty);

        // A show-graph completion arriving on an empty chart simply becomes
        // the new primary.
        app.series_fetched(FetchIntent::ShowGraph, 2, "Oil", Ok(oil_payload()));

        assert_eq!(app.chart.mode(), ChartMode::SingleView);
        assert_eq!(app.chart.primary_id(), Some(2));
    }

    // Overlapping fetches resolve last-writer-wins at completion time; for a
    // fixed completion order the outcome must be deterministic.
    #[test]
    fn test_fixed_completion_order_is_deterministic() {
        let run = |order: &[(FetchIntent, u32, &str)]| {
            let mut app = app_with_catalog();
            app.selection_made(1);
            app.selection_made(2);
            for &(intent, id, label) in order {
                let payload = if id == 1 { gold_payload() } else { oil_payload() };
                app.series_fetched(intent, id, label, Ok(payload));
            }
            (
                app.chart.mode(),
                app.chart.primary_id(),
                app.chart
                    .instance()
                    .map(|i| i.series.iter().map(|p| p.series.commodity_id).collect::<Vec<_>>()),
            )
        };

        let order_a = [
            (FetchIntent::ShowGraph, 1, "Gold"),
            (FetchIntent::Compare, 2, "Oil"),
        ];
        let order_b = [
            (FetchIntent::Compare, 2, "Oil"),
            (FetchIntent::ShowGraph, 1, "Gold"),
        ];

        // Same order, same outcome, every time.
        assert_eq!(run(&order_a), run(&order_a));
        assert_eq!(run(&order_b), run(&order_b));

        // Different completion orders may legitimately differ: compare-first
        // finds no primary and is discarded.
        assert_eq!(run(&order_a).0, ChartMode::Comparison);
        assert_eq!(run(&order_b).0, ChartMode::SingleView);
    }

    #[test]
    fn test_widget_cursor_clamped_after_remove() {
        let mut app = app_with_catalog();
        app.selection_made(1);
        app.selection_made(2);
        app.focus = Panel::Widgets;
        app.navigate_down();
        assert_eq!(app.widget_index, 1);

        app.widget_action(2, WidgetAction::Remove);

        assert_eq!(app.widget_index, 0);
        assert_eq!(app.focused_widget_id(), Some(1));
    }

    #[test]
    fn test_catalog_navigation_clamped() {
        let mut app = app_with_catalog();
        app.navigate_up();
        assert_eq!(app.catalog_index, 0);
        app.navigate_down();
        assert_eq!(app.catalog_index, 1);
        app.navigate_down();
        assert_eq!(app.catalog_index, 1);
    }
}
