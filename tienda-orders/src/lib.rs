//! Tienda Order Workflow
//!
//! Order persistence and inventory adjustment on top of the record facade.
//!
//! # Architecture
//!
//! ```text
//! Caller → OrderWorkflow → Records → DocumentStore → database
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tienda_orders::OrderWorkflow;
//! use tienda_store::{MemoryStore, Records};
//!
//! let workflow = OrderWorkflow::new(Records::new(Arc::new(MemoryStore::new())));
//!
//! let order_id = workflow.save_order("c1", customer, items.clone(), 19.98).await?;
//! let report = workflow.decrement_inventory(&items).await?;
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod inventory;
pub mod workflow;

// Re-exports for convenience
pub use error::{OrderError, OrderResult};
pub use inventory::{InventoryReport, StockAdjustment};
pub use workflow::{CheckoutReceipt, CheckoutRequest, OrderWorkflow};
