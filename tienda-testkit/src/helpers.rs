//! Seeding helpers.

use serde_json::{json, Value};
use std::sync::Arc;

use tienda_domain::{CollectionName, DocumentId, Fields, LineItem};
use tienda_store::{DocumentStore, MemoryStore, Records};

use anyhow::{anyhow, Result};

/// Turn a JSON object literal into document fields.
///
/// Panics on non-objects; meant for test fixtures only.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be a JSON object, got {}", other),
    }
}

/// Store a product document under a fixed identifier.
///
/// `stock` is stored verbatim, so malformed values can be seeded too.
pub async fn seed_product(
    store: &dyn DocumentStore,
    id: &str,
    nombre: &str,
    precio: f64,
    stock: Value,
) -> Result<DocumentId> {
    let id = DocumentId::new(id)?;
    store
        .put(
            &CollectionName::products(),
            &id,
            fields(json!({"nombre": nombre, "precio": precio, "stock": stock})),
        )
        .await?;
    Ok(id)
}

/// Build line items from `(product id, quantity)` pairs.
pub fn line_items(pairs: &[(&str, u32)]) -> Result<Vec<LineItem>> {
    pairs
        .iter()
        .map(|(id, quantity)| {
            DocumentId::new(*id)
                .map(|id| LineItem::new(id, *quantity))
                .map_err(|e| anyhow!(e))
        })
        .collect()
}

/// A memory-backed facade with products seeded as `(id, stock)` pairs.
///
/// Returns the store too, for direct inspection.
pub async fn seeded_records(products: &[(&str, i64)]) -> Result<(Arc<MemoryStore>, Records)> {
    let store = Arc::new(MemoryStore::new());
    for (id, stock) in products {
        seed_product(store.as_ref(), id, id, 1.0, json!(stock)).await?;
    }
    let records = Records::new(store.clone());
    Ok((store, records))
}
