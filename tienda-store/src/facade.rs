//! Record store facade.
//!
//! Thin pass-through from collection/identifier strings to a
//! [`DocumentStore`]. The only behavior added on top of the store is product
//! normalization on read and the choice between a typed and a fail-open
//! bulk read.

use std::sync::Arc;
use tracing::{debug, error};

use tienda_domain::product::STOCK_FIELD;
use tienda_domain::{
    normalize_product, CollectionName, Document, DocumentId, Fields, Product, Record, StockChange,
};

use crate::error::StoreResult;
use crate::repository::DocumentStore;

/// Facade over a shared document store handle.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn DocumentStore>,
}

impl Records {
    /// Wrap a store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Create a document and return its generated identifier.
    pub async fn add(&self, collection: &str, data: Fields) -> StoreResult<DocumentId> {
        let collection = CollectionName::new(collection)?;
        let id = self.store.insert(&collection, data).await?;
        debug!(%collection, %id, "Document added");
        Ok(id)
    }

    /// Every document in a collection.
    ///
    /// No ordering or limiting is applied. Store failures are returned so the
    /// caller can tell an outage from an empty collection.
    pub async fn get_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collection = CollectionName::new(collection)?;
        let mut docs = self.store.list(&collection).await?;
        if collection.is_products() {
            for doc in &mut docs {
                normalize_product(&mut doc.fields);
            }
        }
        Ok(docs)
    }

    /// Every document in a collection, or an empty list on failure.
    ///
    /// The failure is logged and otherwise indistinguishable from an empty
    /// collection.
    pub async fn get_all_or_empty(&self, collection: &str) -> Vec<Document> {
        match self.get_all(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                error!(collection, error = %e, "Failed to read collection, returning empty list");
                Vec::new()
            },
        }
    }

    /// One document, or `None` if the identifier does not exist.
    pub async fn get_doc(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collection = CollectionName::new(collection)?;
        let id = DocumentId::new(id)?;
        let mut doc = self.store.find(&collection, &id).await?;
        if collection.is_products() {
            if let Some(doc) = doc.as_mut() {
                normalize_product(&mut doc.fields);
            }
        }
        Ok(doc)
    }

    /// One document decoded as its collection's record variant.
    pub async fn get_record(&self, collection: &str, id: &str) -> StoreResult<Option<Record>> {
        let name = CollectionName::new(collection)?;
        match self.get_doc(collection, id).await? {
            Some(doc) => Ok(Some(Record::from_document(&name, doc)?)),
            None => Ok(None),
        }
    }

    /// Every product, typed.
    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let docs = self.store.list(&CollectionName::products()).await?;
        Ok(docs.into_iter().map(Product::from_document).collect())
    }

    /// Atomically take `quantity` units from a product's stock, flooring at zero.
    ///
    /// Returns `None` if the product does not exist; nothing is created.
    pub async fn decrement_stock(&self, product_id: &DocumentId, quantity: u32) -> StoreResult<Option<StockChange>> {
        self.store
            .decrement_floored(&CollectionName::products(), product_id, STOCK_FIELD, quantity)
            .await
    }

    /// Merge fields into an existing document.
    ///
    /// Fails with `StoreError::NotFound` if the document does not exist.
    pub async fn update(&self, collection: &str, id: &str, data: Fields) -> StoreResult<()> {
        let collection = CollectionName::new(collection)?;
        let id = DocumentId::new(id)?;
        self.store.merge(&collection, &id, data).await?;
        debug!(%collection, %id, "Document updated");
        Ok(())
    }

    /// Delete a document. Deleting a missing document is not an error.
    pub async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let collection = CollectionName::new(collection)?;
        let id = DocumentId::new(id)?;
        self.store.remove(&collection, &id).await?;
        debug!(%collection, %id, "Document deleted");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
