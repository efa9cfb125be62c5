//! In-memory store implementation
//!
//! Used for testing and development without a database.
//! Thread-safe using RwLock for concurrent access; every write, including
//! the floored decrement, happens under a single write lock.

use crate::error::StoreError;
use crate::repository::DocumentStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tienda_domain::document::merge_fields;
use tienda_domain::{coerce_stock, CollectionName, Document, DocumentId, Fields, StockChange};
use tracing::debug;

type Collections = HashMap<CollectionName, BTreeMap<DocumentId, Fields>>;

/// In-memory document store
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of documents in a collection
    pub fn document_count(&self, collection: &CollectionName) -> usize {
        self.read()
            .map(|collections| collections.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        if let Ok(mut collections) = self.write() {
            collections.clear();
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &CollectionName, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();
        let mut collections = self.write()?;
        collections.entry(collection.clone()).or_default().insert(id.clone(), fields);
        Ok(id)
    }

    async fn put(&self, collection: &CollectionName, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.write()?;
        collections.entry(collection.clone()).or_default().insert(id.clone(), fields);
        Ok(())
    }

    async fn list(&self, collection: &CollectionName) -> Result<Vec<Document>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone())))
    }

    async fn merge(&self, collection: &CollectionName, id: &DocumentId, patch: Fields) -> Result<(), StoreError> {
        let mut collections = self.write()?;
        let fields = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection.as_str(), id.as_str()))?;
        merge_fields(fields, patch);
        Ok(())
    }

    async fn remove(&self, collection: &CollectionName, id: &DocumentId) -> Result<(), StoreError> {
        let mut collections = self.write()?;
        let removed = collections.get_mut(collection).and_then(|docs| docs.remove(id)).is_some();
        if !removed {
            debug!(%collection, %id, "Delete of missing document ignored");
        }
        Ok(())
    }

    async fn decrement_floored(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        field: &str,
        amount: u32,
    ) -> Result<Option<StockChange>, StoreError> {
        let mut collections = self.write()?;
        let Some(fields) = collections.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
            return Ok(None);
        };

        let previous = fields.get(field).map_or(0, coerce_stock);
        let change = StockChange::apply(previous, amount);
        fields.insert(field.to_string(), change.current.into());
        Ok(Some(change))
    }
}

// =============================================================================
// Tests
// =============================================================================
