//! Order workflow error types.

use thiserror::Error;

use tienda_domain::DocumentId;
use tienda_store::StoreError;

use crate::inventory::StockAdjustment;

/// Errors that can occur while placing orders or adjusting inventory.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] tienda_domain::DomainError),

    /// Inventory decrement stopped part-way
    ///
    /// Adjustments listed in `applied` were committed before the failure and
    /// are not rolled back.
    #[error("Inventory update failed at product {product_id} after {} adjustment(s): {source}", .applied.len())]
    Inventory {
        /// Product whose decrement failed
        product_id: DocumentId,
        /// Adjustments already committed
        applied: Vec<StockAdjustment>,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },
}

/// Result type for order operations.
pub type OrderResult<T> = Result<T, OrderError>;
