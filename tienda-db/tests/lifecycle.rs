//! Integration tests for import and status against PostgreSQL.
//!
//! Run with: `cargo test -p tienda-db --features postgres`

#![cfg(feature = "postgres")]

use serde_json::json;
use sqlx::{PgPool, Row};
use tienda_db::{import_documents, status, ImportSummary};
use tienda_domain::CollectionName;

#[sqlx::test(migrations = "../migrations")]
async fn test_import_twice_skips_existing(pool: PgPool) {
    let products = CollectionName::products();
    let documents = vec![
        json!({"id": "p1", "nombre": "Café", "stock": 5}),
        json!({"id": "p2", "nombre": "Té", "stock": 2}),
    ];

    let first = import_documents(&pool, &products, documents.clone()).await.unwrap();
    assert_eq!(first, ImportSummary { inserted: 2, skipped: 0 });

    let changed = vec![
        json!({"id": "p1", "nombre": "Café", "stock": 99}),
        json!({"id": "p3", "nombre": "Pan", "stock": 1}),
    ];
    let second = import_documents(&pool, &products, changed).await.unwrap();
    assert_eq!(second, ImportSummary { inserted: 1, skipped: 1 });

    let again = import_documents(&pool, &products, documents).await.unwrap();
    assert_eq!(again, ImportSummary { inserted: 0, skipped: 2 });

    // Existing documents are left untouched
    let row = sqlx::query("SELECT data FROM documents WHERE collection = $1 AND id = $2")
        .bind(products.as_str())
        .bind("p1")
        .fetch_one(&pool)
        .await
        .unwrap();
    let data: sqlx::types::Json<serde_json::Value> = row.get("data");
    assert_eq!(data.0, json!({"nombre": "Café", "stock": 5}));
}

#[sqlx::test(migrations = "../migrations")]
async fn test_import_same_id_in_other_collection(pool: PgPool) {
    let docs = vec![json!({"id": "x1", "total": 3})];

    let orders = import_documents(&pool, &CollectionName::orders(), docs.clone()).await.unwrap();
    let other = import_documents(&pool, &CollectionName::new("clientes").unwrap(), docs).await.unwrap();

    assert_eq!(orders.inserted, 1);
    assert_eq!(other.inserted, 1);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_malformed_import_writes_nothing(pool: PgPool) {
    let docs = vec![json!({"id": "ok", "stock": 1}), json!(["not", "an", "object"])];

    assert!(import_documents(&pool, &CollectionName::products(), docs).await.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_status_reports_schema_and_documents(pool: PgPool) {
    import_documents(&pool, &CollectionName::products(), vec![json!({"stock": 1})])
        .await
        .unwrap();

    let report = status(&pool).await.unwrap();

    assert!(report.documents_table);
    assert_eq!(report.document_count, 1);
    assert!(!report.migrations.is_empty());
    assert!(report.migrations.iter().all(|m| m.success));
}
