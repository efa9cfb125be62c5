//! PostgreSQL document store.
//!
//! Documents live in a single JSONB table:
//!
//! ```text
//! documents(collection TEXT, id TEXT, data JSONB, created_at, updated_at)
//!   PRIMARY KEY (collection, id)
//! ```
//!
//! This module uses dynamic queries (sqlx::query) instead of compile-time
//! checked macros (sqlx::query!) to allow compilation without DATABASE_URL.

use crate::error::StoreError;
use crate::repository::DocumentStore;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tienda_domain::document::merge_fields;
use tienda_domain::{CollectionName, Document, DocumentId, Fields, StockChange};
use tracing::debug;

/// Stock coercion in SQL, matching `tienda_domain::coerce_stock`:
/// numbers truncate and saturate, integer strings in the bigint range parse,
/// booleans map to 1/0, the rest is 0.
///
/// Nested CASEs keep the numeric cast from running on non-numeric strings.
const COERCED_FIELD: &str = r#"
    CASE jsonb_typeof(data -> $3::text)
        WHEN 'number' THEN LEAST(GREATEST(
            trunc((data ->> $3::text)::numeric),
            -9223372036854775808), 9223372036854775807)::bigint
        WHEN 'string' THEN
            CASE WHEN btrim(data ->> $3::text) ~ '^[+-]?[0-9]+$' THEN
                CASE WHEN btrim(data ->> $3::text)::numeric
                          BETWEEN -9223372036854775808 AND 9223372036854775807
                     THEN btrim(data ->> $3::text)::bigint
                     ELSE 0
                END
            ELSE 0
            END
        WHEN 'boolean' THEN CASE WHEN (data ->> $3::text)::boolean THEN 1 ELSE 0 END
        ELSE 0
    END
"#;

/// PostgreSQL adapter for the document store port.
pub struct PgDocumentStore {
    /// PostgreSQL connection pool
    pool: Arc<PgPool>,
}

impl PgDocumentStore {
    /// Create a new PostgreSQL document store.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool (for testing).
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_document_row(row: &PgRow) -> Result<Document, StoreError> {
    let id: String = row.try_get("id")?;
    let Json(data): Json<Value> = row.try_get("data")?;

    let fields = match data {
        Value::Object(fields) => fields,
        other => {
            return Err(StoreError::Deserialization(format!(
                "document {} is not an object: {}",
                id, other
            )))
        },
    };

    Ok(Document::new(DocumentId::new(id)?, fields))
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &CollectionName, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(Value::Object(fields)))
        .execute(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn put(&self, collection: &CollectionName, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(Value::Object(fields)))
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list(&self, collection: &CollectionName) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query("SELECT id, data FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.iter().map(parse_document_row).collect()
    }

    async fn find(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.as_ref().map(parse_document_row).transpose()
    }

    async fn merge(&self, collection: &CollectionName, id: &DocumentId, patch: Fields) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(StoreError::not_found(collection.as_str(), id.as_str()));
        };

        let mut doc = parse_document_row(&row)?;
        merge_fields(&mut doc.fields, patch);

        sqlx::query(
            "UPDATE documents SET data = $3, updated_at = NOW() WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(Json(Value::Object(doc.fields)))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, collection: &CollectionName, id: &DocumentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
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
        // Single statement: the row lock taken by the sub-select is held until
        // the UPDATE commits, so concurrent decrements serialize. The
        // subtraction runs in numeric so a stock at the bigint minimum floors
        // to 0 instead of overflowing.
        let query = format!(
            r#"
            WITH locked AS (
                SELECT collection, id, {coerced} AS previous
                FROM documents
                WHERE collection = $1 AND id = $2
                FOR UPDATE
            )
            UPDATE documents d
            SET data = jsonb_set(d.data, ARRAY[$3::text],
                                 to_jsonb(GREATEST(0, c.previous::numeric - $4)::bigint)),
                updated_at = NOW()
            FROM locked c
            WHERE d.collection = c.collection AND d.id = c.id
            RETURNING c.previous AS previous, GREATEST(0, c.previous::numeric - $4)::bigint AS remaining
            "#,
            coerced = COERCED_FIELD
        );

        let row = sqlx::query(&query)
            .bind(collection.as_str())
            .bind(id.as_str())
            .bind(field)
            .bind(i64::from(amount))
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => Ok(Some(StockChange {
                previous: row.try_get("previous")?,
                current: row.try_get("remaining")?,
            })),
            None => Ok(None),
        }
    }
}
