//! Tienda Domain Layer
//!
//! Typed records for the shop's document collections, with zero I/O.
//! Contains identifiers, products, orders, line items and the field
//! coercion rules applied at the store boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod credentials;
pub mod document;
pub mod order;
pub mod product;
pub mod record;
pub mod value_objects;

// Re-export commonly used types
pub use credentials::ServiceCredentials;
pub use document::{Document, Fields};
pub use order::{LineItem, Order};
pub use product::{coerce_price, coerce_stock, normalize_product, Product, StockChange};
pub use record::Record;
pub use value_objects::{CollectionName, DocumentId, DomainError, ORDERS, PRODUCTS};
