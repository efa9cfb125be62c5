//! Substitute stores for testing.
//!
//! These implementations simulate an unreachable or partially failing
//! database without a real connection.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

use tienda_domain::{CollectionName, Document, DocumentId, Fields, StockChange};
use tienda_store::{DocumentStore, MemoryStore, StoreError};

fn unavailable() -> StoreError {
    StoreError::Connection("database unavailable".to_string())
}

// =============================================================================
// Failing Store
// =============================================================================

/// Store where every operation fails with a connection error.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, _: &CollectionName, _: Fields) -> Result<DocumentId, StoreError> {
        Err(unavailable())
    }

    async fn put(&self, _: &CollectionName, _: &DocumentId, _: Fields) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list(&self, _: &CollectionName) -> Result<Vec<Document>, StoreError> {
        Err(unavailable())
    }

    async fn find(&self, _: &CollectionName, _: &DocumentId) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn merge(&self, _: &CollectionName, _: &DocumentId, _: Fields) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn remove(&self, _: &CollectionName, _: &DocumentId) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn decrement_floored(
        &self,
        _: &CollectionName,
        _: &DocumentId,
        _: &str,
        _: u32,
    ) -> Result<Option<StockChange>, StoreError> {
        Err(unavailable())
    }
}

// =============================================================================
// Faulty Store
// =============================================================================

/// Memory store that fails on selected documents or collections.
///
/// Operations on anything not marked faulty go to the inner [`MemoryStore`].
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    faulty_ids: RwLock<HashSet<DocumentId>>,
    faulty_collections: RwLock<HashSet<CollectionName>>,
}

impl FaultyStore {
    /// Create a faulty store with nothing marked.
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped memory store.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Make every operation on document `id` fail.
    pub fn fail_document(&self, id: &DocumentId) {
        self.faulty_ids.write().unwrap().insert(id.clone());
    }

    /// Make every operation on `collection` fail.
    pub fn fail_collection(&self, collection: &CollectionName) {
        self.faulty_collections.write().unwrap().insert(collection.clone());
    }

    fn check(&self, collection: &CollectionName, id: Option<&DocumentId>) -> Result<(), StoreError> {
        if self.faulty_collections.read().unwrap().contains(collection) {
            return Err(unavailable());
        }
        if let Some(id) = id {
            if self.faulty_ids.read().unwrap().contains(id) {
                return Err(unavailable());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn insert(&self, collection: &CollectionName, fields: Fields) -> Result<DocumentId, StoreError> {
        self.check(collection, None)?;
        self.inner.insert(collection, fields).await
    }

    async fn put(&self, collection: &CollectionName, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        self.check(collection, Some(id))?;
        self.inner.put(collection, id, fields).await
    }

    async fn list(&self, collection: &CollectionName) -> Result<Vec<Document>, StoreError> {
        self.check(collection, None)?;
        self.inner.list(collection).await
    }

    async fn find(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        self.check(collection, Some(id))?;
        self.inner.find(collection, id).await
    }

    async fn merge(&self, collection: &CollectionName, id: &DocumentId, patch: Fields) -> Result<(), StoreError> {
        self.check(collection, Some(id))?;
        self.inner.merge(collection, id, patch).await
    }

    async fn remove(&self, collection: &CollectionName, id: &DocumentId) -> Result<(), StoreError> {
        self.check(collection, Some(id))?;
        self.inner.remove(collection, id).await
    }

    async fn decrement_floored(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        field: &str,
        amount: u32,
    ) -> Result<Option<StockChange>, StoreError> {
        self.check(collection, Some(id))?;
        self.inner.decrement_floored(collection, id, field, amount).await
    }
}
