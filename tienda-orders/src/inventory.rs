//! Inventory adjustment results.

use serde::Serialize;

use tienda_domain::{DocumentId, StockChange};

/// One committed stock decrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAdjustment {
    /// Adjusted product
    pub product_id: DocumentId,
    /// Units requested by the line item
    pub requested: u32,
    /// Stock before and after
    #[serde(flatten)]
    pub change: StockChange,
}

/// Outcome of decrementing inventory for a list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    /// Decrements applied, in line item order
    pub adjustments: Vec<StockAdjustment>,
    /// Line items whose product does not exist
    pub skipped: Vec<DocumentId>,
}

impl InventoryReport {
    /// Whether every line item referenced an existing product.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Adjustments where the requested quantity exceeded the available stock.
    pub fn clamped(&self) -> impl Iterator<Item = &StockAdjustment> {
        self.adjustments
            .iter()
            .filter(|adj| adj.change.removed() < i64::from(adj.requested))
    }
}
