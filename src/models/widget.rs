// ============================================================================
// WidgetState / WidgetRegistry
// ============================================================================
// A widget is the card representing one open commodity, carrying its three
// action affordances. The registry enforces at most one widget per commodity
// and owns removal. Widgets are pure data; rendering is a separate pass over
// the registry (ui::dashboard), so the "what is open" invariant is testable
// without a terminal.
// ============================================================================

use crate::error::{DashError, Result};
use crate::models::CommodityRecord;

/// Actions offered by every widget card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    /// Plot this commodity as the chart's primary series.
    ShowGraph,

    /// Overlay this commodity on the existing chart.
    Compare,

    /// Close the widget (and clear the chart if it was the primary).
    Remove,
}

impl WidgetAction {
    /// All affordances, in card display order.
    pub fn all() -> [WidgetAction; 3] {
        [
            WidgetAction::ShowGraph,
            WidgetAction::Compare,
            WidgetAction::Remove,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            WidgetAction::ShowGraph => "Show Graph",
            WidgetAction::Compare => "Compare",
            WidgetAction::Remove => "Remove",
        }
    }
}

/// One open commodity card.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    /// The commodity this widget is bound to. Unique across open widgets.
    pub commodity: CommodityRecord,
}

impl WidgetState {
    pub fn new(commodity: CommodityRecord) -> Self {
        Self { commodity }
    }

    pub fn commodity_id(&self) -> u32 {
        self.commodity.id
    }
}

/// Tracks which commodities currently have an open widget.
///
/// Insertion order is preserved so the cards render in the order the user
/// opened them.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: Vec<WidgetState>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            widgets: Vec::new(),
        }
    }

    /// Opens a widget for `commodity`.
    ///
    /// Fails with `AlreadyOpen` if one exists for that id; the registry is
    /// left untouched in that case.
    pub fn open(&mut self, commodity: CommodityRecord) -> Result<()> {
        if self.is_open(commodity.id) {
            return Err(DashError::AlreadyOpen(commodity.id));
        }
        self.widgets.push(WidgetState::new(commodity));
        Ok(())
    }

    /// Removes the widget for `id` if present. Returns whether a widget was
    /// actually removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| w.commodity_id() != id);
        self.widgets.len() != before
    }

    pub fn is_open(&self, id: u32) -> bool {
        self.widgets.iter().any(|w| w.commodity_id() == id)
    }

    pub fn get(&self, id: u32) -> Option<&WidgetState> {
        self.widgets.iter().find(|w| w.commodity_id() == id)
    }

    /// Open widgets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetState> {
        self.widgets.iter()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widget at a display position, for keyboard focus.
    pub fn at(&self, index: usize) -> Option<&WidgetState> {
        self.widgets.get(index)
    }
}

// ============================================================================
// Tests
// ============================================================================
