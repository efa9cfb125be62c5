//! Typed record variants.
//!
//! The store keeps schema-less documents; this is where they become typed.
//! Which variant a document decodes to is decided by its collection.

use serde::Serialize;

use crate::document::Document;
use crate::order::Order;
use crate::product::Product;
use crate::value_objects::{CollectionName, DocumentId, DomainError};

/// A document decoded according to its collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Document from the products collection
    Product(Product),
    /// Document from the orders collection
    Order {
        /// Order identifier
        id: DocumentId,
        /// Decoded order
        #[serde(flatten)]
        order: Order,
    },
    /// Document from any other collection
    Generic(Document),
}

impl Record {
    /// Decode a document read from `collection`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidOrder` for a malformed order document.
    /// Products and generic documents always decode.
    pub fn from_document(collection: &CollectionName, doc: Document) -> Result<Self, DomainError> {
        if collection.is_products() {
            return Ok(Record::Product(Product::from_document(doc)));
        }
        if collection.is_orders() {
            let order = Order::from_document(&doc)?;
            return Ok(Record::Order { id: doc.id, order });
        }
        Ok(Record::Generic(doc))
    }

    /// Identifier of the underlying document.
    pub fn id(&self) -> &DocumentId {
        match self {
            Record::Product(product) => &product.id,
            Record::Order { id, .. } => id,
            Record::Generic(doc) => &doc.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: serde_json::Value) -> Document {
        Document::new(DocumentId::new(id).unwrap(), value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_products_decode_as_product() {
        let record = Record::from_document(
            &CollectionName::products(),
            doc("p1", json!({"nombre": "Mate", "precio": "bad", "stock": "7"})),
        )
        .unwrap();

        match record {
            Record::Product(product) => {
                assert_eq!(product.precio, 0.0);
                assert_eq!(product.stock, 7);
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_order_is_an_error() {
        let result = Record::from_document(&CollectionName::orders(), doc("o1", json!({"total": 1.0})));
        assert!(matches!(result, Err(DomainError::InvalidOrder(_))));
    }

    #[test]
    fn test_other_collections_are_generic() {
        let record =
            Record::from_document(&CollectionName::new("clientes").unwrap(), doc("c1", json!({"x": 1})))
                .unwrap();

        assert!(matches!(record, Record::Generic(_)));
        assert_eq!(record.id().as_str(), "c1");
    }
}
