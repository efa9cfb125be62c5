//! Document store trait definition (Port)
//!
//! This trait is the whole contract the application needs from a document
//! database. Implementations can be PostgreSQL, in-memory, or a substitute
//! for testing.

use crate::error::StoreError;
use async_trait::async_trait;
use tienda_domain::{CollectionName, Document, DocumentId, Fields, StockChange};

/// Storage port for schema-less documents grouped in collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-generated identifier
    async fn insert(&self, collection: &CollectionName, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Create or replace the document at `id`
    async fn put(&self, collection: &CollectionName, id: &DocumentId, fields: Fields) -> Result<(), StoreError>;

    /// Every document of a collection (no ordering guarantee, no limit)
    async fn list(&self, collection: &CollectionName) -> Result<Vec<Document>, StoreError>;

    /// Find a document by ID
    async fn find(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Merge fields into an existing document
    ///
    /// Dotted keys address nested fields. Fails with `StoreError::NotFound`
    /// when the document does not exist.
    async fn merge(&self, collection: &CollectionName, id: &DocumentId, patch: Fields) -> Result<(), StoreError>;

    /// Delete a document (no error if it does not exist)
    async fn remove(&self, collection: &CollectionName, id: &DocumentId) -> Result<(), StoreError>;

    /// Atomically subtract `amount` from an integer field, flooring at zero
    ///
    /// The current value is read with stock coercion (malformed → 0) and the
    /// new value is written in the same atomic step, so concurrent callers
    /// never lose each other's decrements. Returns `None`, and writes
    /// nothing, when the document does not exist.
    async fn decrement_floored(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        field: &str,
        amount: u32,
    ) -> Result<Option<StockChange>, StoreError>;
}
