//! Order workflow: persist orders and decrement inventory.
//!
//! # Flow
//!
//! ```text
//! checkout → save_order → pedidos
//!          → decrement_inventory → productos (one atomic decrement per item)
//! ```
//!
//! Nothing here holds a lock or retries. Atomicity is per product and comes
//! from the store's floored decrement; there is no transaction across items,
//! so a failure part-way leaves earlier decrements committed.

use serde::Deserialize;
use tracing::{debug, info, warn};

use tienda_domain::{DocumentId, Fields, LineItem, Order, ORDERS};
use tienda_store::Records;

use crate::error::{OrderError, OrderResult};
use crate::inventory::{InventoryReport, StockAdjustment};

// =============================================================================
// Checkout
// =============================================================================

/// Everything needed to place an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    /// Customer identifier
    #[serde(rename = "cliente_id")]
    pub customer_id: String,
    /// Customer data, stored as-is
    #[serde(rename = "cliente", default)]
    pub customer: Fields,
    /// Ordered products
    pub items: Vec<LineItem>,
    /// Order total
    pub total: f64,
}

/// Result of a checkout.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutReceipt {
    /// Identifier of the stored order
    pub order_id: DocumentId,
    /// Stock changes caused by the order
    pub inventory: InventoryReport,
}

// =============================================================================
// Workflow
// =============================================================================

/// Places orders and keeps product stock in step with them.
#[derive(Clone)]
pub struct OrderWorkflow {
    /// Facade over the shared store handle
    records: Records,
}

impl OrderWorkflow {
    /// Create a workflow over a record facade.
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// The record facade this workflow writes through.
    pub fn records(&self) -> &Records {
        &self.records
    }

    /// Persist an order and return its identifier.
    ///
    /// The order is stamped with the current UTC time. Items and total are
    /// stored as given; nothing checks that they agree.
    pub async fn save_order(
        &self,
        customer_id: &str,
        customer: Fields,
        items: Vec<LineItem>,
        total: f64,
    ) -> OrderResult<DocumentId> {
        let order = Order::new(customer_id, customer, items, total)?;
        let order_id = self.records.add(ORDERS, order.to_fields()?).await?;

        info!(
            %order_id,
            customer_id,
            items = order.items.len(),
            total = order.total,
            "Order saved"
        );

        Ok(order_id)
    }

    /// Subtract each line item's quantity from its product's stock.
    ///
    /// Each decrement is atomic and floors at zero. Items referencing a
    /// missing product are skipped and listed in the report; processing
    /// continues with the next item.
    ///
    /// # Errors
    /// `OrderError::Inventory` if the store fails; adjustments made before
    /// the failure stay committed and are carried in the error.
    pub async fn decrement_inventory(&self, items: &[LineItem]) -> OrderResult<InventoryReport> {
        let mut report = InventoryReport::default();

        for item in items {
            let outcome = self.records.decrement_stock(&item.product_id, item.quantity).await;

            match outcome {
                Ok(Some(change)) => {
                    debug!(
                        product_id = %item.product_id,
                        requested = item.quantity,
                        previous = change.previous,
                        current = change.current,
                        "Stock decremented"
                    );
                    report.adjustments.push(StockAdjustment {
                        product_id: item.product_id.clone(),
                        requested: item.quantity,
                        change,
                    });
                },
                Ok(None) => {
                    debug!(product_id = %item.product_id, "Product not found, skipping stock decrement");
                    report.skipped.push(item.product_id.clone());
                },
                Err(source) => {
                    warn!(
                        product_id = %item.product_id,
                        applied = report.adjustments.len(),
                        error = %source,
                        "Stock decrement failed part-way"
                    );
                    return Err(OrderError::Inventory {
                        product_id: item.product_id.clone(),
                        applied: report.adjustments,
                        source,
                    });
                },
            }
        }

        Ok(report)
    }

    /// Save an order, then decrement inventory for its items.
    ///
    /// If the order cannot be saved, stock is not touched.
    pub async fn checkout(&self, request: CheckoutRequest) -> OrderResult<CheckoutReceipt> {
        let CheckoutRequest { customer_id, customer, items, total } = request;

        let order_id = self.save_order(&customer_id, customer, items.clone(), total).await?;
        let inventory = self.decrement_inventory(&items).await?;

        if !inventory.is_complete() {
            info!(%order_id, skipped = inventory.skipped.len(), "Order references unknown products");
        }

        Ok(CheckoutReceipt { order_id, inventory })
    }
}
