//! Value Objects for the Tienda Domain
//!
//! Validated identifiers shared by every layer.
//! All value objects enforce invariants at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Collection holding product documents.
pub const PRODUCTS: &str = "productos";

/// Collection holding order documents.
pub const ORDERS: &str = "pedidos";

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Collection name is empty or malformed
    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    /// Document identifier is empty or malformed
    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),

    /// Line item is missing fields or has a bad quantity
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    /// Order payload cannot be built or decoded
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Service credentials blob is malformed
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

fn check_path_segment(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("must be non-empty".to_string());
    }
    if value.contains('/') {
        return Err(format!("'{}' must not contain '/'", value));
    }
    Ok(())
}

// =============================================================================
// CollectionName
// =============================================================================

/// Name of a collection of documents (e.g., `productos`)
///
/// # Invariants
/// - Non-empty
/// - No `/` (collections are a single path segment)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new CollectionName with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidCollection` if the name is empty or contains `/`
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        check_path_segment(&name).map_err(DomainError::InvalidCollection)?;
        Ok(Self(name))
    }

    /// The products collection
    pub fn products() -> Self {
        Self(PRODUCTS.to_string())
    }

    /// The orders collection
    pub fn orders() -> Self {
        Self(ORDERS.to_string())
    }

    /// Whether reads from this collection get product normalization
    pub fn is_products(&self) -> bool {
        self.0 == PRODUCTS
    }

    /// Whether this collection stores orders
    pub fn is_orders(&self) -> bool {
        self.0 == ORDERS
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// DocumentId
// =============================================================================

/// Opaque identifier of a document within a collection
///
/// Generated identifiers are UUIDv7 in simple (hex) form, so they sort by
/// creation time.
///
/// # Invariants
/// - Non-empty
/// - No `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a DocumentId from an existing identifier
    ///
    /// # Errors
    /// Returns `DomainError::InvalidDocumentId` if the id is empty or contains `/`
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        check_path_segment(&id).map_err(DomainError::InvalidDocumentId)?;
        Ok(Self(id))
    }

    /// Generate a fresh, time-ordered identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_validation() {
        assert!(CollectionName::new("productos").is_ok());
        assert!(CollectionName::new("").is_err());
        assert!(CollectionName::new("   ").is_err());
        assert!(CollectionName::new("a/b").is_err());
    }

    #[test]
    fn test_well_known_collections() {
        assert!(CollectionName::products().is_products());
        assert!(!CollectionName::products().is_orders());
        assert!(CollectionName::orders().is_orders());
        assert!(!CollectionName::new("clientes").unwrap().is_products());
    }

    #[test]
    fn test_document_id_validation() {
        assert!(DocumentId::new("p1").is_ok());
        assert!(matches!(DocumentId::new(""), Err(DomainError::InvalidDocumentId(_))));
        assert!(matches!(DocumentId::new("x/y"), Err(DomainError::InvalidDocumentId(_))));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let first = DocumentId::generate();
        let second = DocumentId::generate();

        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 32);
    }

    #[test]
    fn test_document_id_serde_rejects_invalid() {
        let ok: DocumentId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(ok.as_str(), "abc");

        let bad: Result<DocumentId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
