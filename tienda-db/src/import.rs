//! Bulk document import.
//!
//! Loads a JSON array of documents into one collection. Documents carrying a
//! string `id` keep it; the rest get a generated one. Existing documents are
//! left untouched, so re-running an import is harmless.

use serde::Serialize;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use tienda_domain::document::ID_FIELD;
use tienda_domain::{CollectionName, DocumentId, Fields};

use super::Result;

/// Counts from one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Documents written
    pub inserted: u64,
    /// Documents whose id already existed
    pub skipped: u64,
}

/// Split a raw JSON document into its identifier and fields.
///
/// # Errors
/// Fails if the value is not an object or its `id` is not a valid identifier.
pub fn prepare_document(value: Value) -> Result<(DocumentId, Fields)> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => anyhow::bail!("document must be a JSON object, got {}", other),
    };

    let id = match fields.remove(ID_FIELD) {
        Some(Value::String(id)) => DocumentId::new(id)?,
        Some(other) => anyhow::bail!("document id must be a string, got {}", other),
        None => DocumentId::generate(),
    };

    Ok((id, fields))
}

/// Insert documents into a collection in one transaction.
///
/// Uses INSERT ... ON CONFLICT DO NOTHING for idempotency. A malformed
/// document aborts the whole import before anything is written.
pub async fn import_documents(
    pool: &PgPool,
    collection: &CollectionName,
    documents: Vec<Value>,
) -> Result<ImportSummary> {
    let prepared = documents
        .into_iter()
        .map(prepare_document)
        .collect::<Result<Vec<_>>>()?;

    let mut summary = ImportSummary::default();
    let mut tx = pool.begin().await?;

    for (id, fields) in prepared {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(Value::Object(fields)))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            summary.skipped += 1;
        } else {
            summary.inserted += 1;
        }
    }

    tx.commit().await?;

    info!(
        %collection,
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Import completed"
    );
    Ok(summary)
}
