//! Tienda Storage Layer
//!
//! Provides persistence for schema-less documents grouped in collections,
//! and the record facade used by the order workflow.
//!
//! # Architecture
//!
//! - **DocumentStore trait**: Defines the storage interface (port)
//! - **In-memory store**: Fast implementation for testing
//! - **PostgreSQL store**: Production implementation (feature `postgres`)
//! - **Records**: Facade adding product normalization on read
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tienda_store::{MemoryStore, Records};
//!
//! #[tokio::main]
//! async fn main() {
//!     let records = Records::new(Arc::new(MemoryStore::new()));
//!
//!     let mut data = serde_json::Map::new();
//!     data.insert("nombre".into(), "Café".into());
//!     data.insert("stock".into(), "12".into());
//!     let id = records.add("productos", data).await.unwrap();
//!
//!     // Product reads coerce stock to an integer
//!     let doc = records.get_doc("productos", id.as_str()).await.unwrap().unwrap();
//!     assert_eq!(doc.get("stock"), Some(&serde_json::json!(12)));
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod facade;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod repository;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use facade::Records;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgDocumentStore;
pub use repository::DocumentStore;
