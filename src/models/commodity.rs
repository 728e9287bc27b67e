// ============================================================================
// CommodityRecord
// ============================================================================
// One entry of the commodity catalog. Records are created in bulk when the
// catalog loads, never mutated afterwards.
// ============================================================================

use serde::{Deserialize, Serialize};

/// A commodity as delivered by the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityRecord {
    /// Unique, stable identifier.
    pub id: u32,

    /// Display name (ex: "Gold", "Crude Oil").
    pub name: String,

    /// Short exchange code (ex: "XAU", "WTI").
    pub code: String,

    /// Free-text description shown on the widget card.
    pub information: String,
}

impl CommodityRecord {
    pub fn new(id: u32, name: &str, code: &str, information: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            code: code.to_string(),
            information: information.to_string(),
        }
    }

    /// Key used to query the price-series provider.
    ///
    /// The provider indexes series by upper-cased commodity name, not by
    /// catalog id.
    pub fn provider_key(&self) -> String {
        self.name.to_uppercase()
    }
}

// ============================================================================
// Tests
// ============================================================================
