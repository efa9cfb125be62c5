//! Integration tests for the order workflow against substitute stores.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use tienda_domain::{CollectionName, DocumentId, Order, StockChange, ORDERS, PRODUCTS};
use tienda_orders::{CheckoutRequest, OrderError, OrderWorkflow};
use tienda_store::{DocumentStore, Records, StoreError};
use tienda_testkit::{fields, line_items, seed_product, seeded_records, FailingStore, FaultyStore};

#[tokio::test]
async fn test_save_order_persists_fields() -> anyhow::Result<()> {
    let (_store, records) = seeded_records(&[]).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let before = Utc::now();
    let order_id = workflow
        .save_order("c1", fields(json!({"nombre": "Ana"})), line_items(&[("p1", 2)])?, 19.98)
        .await?;

    let doc = records.get_doc(ORDERS, order_id.as_str()).await?.expect("order stored");
    assert_eq!(doc.get("cliente_id"), Some(&json!("c1")));
    assert_eq!(doc.get("cliente"), Some(&json!({"nombre": "Ana"})));
    assert_eq!(doc.get("items"), Some(&json!([{"id": "p1", "cantidad": 2}])));
    assert_eq!(doc.get("total"), Some(&json!(19.98)));

    let fecha = doc.get("fecha").and_then(|v| v.as_str()).expect("fecha is a string");
    assert!(fecha.ends_with('Z'));
    let fecha: DateTime<Utc> = DateTime::parse_from_rfc3339(fecha)?.with_timezone(&Utc);
    assert!(fecha >= before - chrono::Duration::seconds(1));

    let order = Order::from_document(&doc)?;
    assert_eq!(order.total_units(), 2);
    Ok(())
}

#[tokio::test]
async fn test_save_order_accepts_empty_items() -> anyhow::Result<()> {
    let (store, records) = seeded_records(&[]).await?;
    let workflow = OrderWorkflow::new(records);

    workflow.save_order("c1", Default::default(), vec![], 0.0).await?;

    assert_eq!(store.document_count(&CollectionName::orders()), 1);
    Ok(())
}

#[tokio::test]
async fn test_save_order_rejects_non_finite_total() -> anyhow::Result<()> {
    let (store, records) = seeded_records(&[]).await?;
    let workflow = OrderWorkflow::new(records);

    let result = workflow.save_order("c1", Default::default(), vec![], f64::NAN).await;

    assert!(matches!(result, Err(OrderError::Domain(_))));
    assert_eq!(store.document_count(&CollectionName::orders()), 0);
    Ok(())
}

#[tokio::test]
async fn test_save_order_propagates_store_failure() -> anyhow::Result<()> {
    let workflow = OrderWorkflow::new(Records::new(Arc::new(FailingStore)));

    let result = workflow.save_order("c1", Default::default(), vec![], 1.0).await;

    assert!(matches!(result, Err(OrderError::Store(StoreError::Connection(_)))));
    Ok(())
}

#[tokio::test]
async fn test_decrement_inventory_subtracts() -> anyhow::Result<()> {
    let (_store, records) = seeded_records(&[("p1", 10), ("p2", 4)]).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let report = workflow.decrement_inventory(&line_items(&[("p1", 3), ("p2", 1)])?).await?;

    assert!(report.is_complete());
    assert_eq!(report.adjustments.len(), 2);
    assert_eq!(report.adjustments[0].change, StockChange { previous: 10, current: 7 });
    assert_eq!(report.clamped().count(), 0);

    let p1 = records.get_doc(PRODUCTS, "p1").await?.expect("p1 exists");
    assert_eq!(p1.get("stock"), Some(&json!(7)));
    let p2 = records.get_doc(PRODUCTS, "p2").await?.expect("p2 exists");
    assert_eq!(p2.get("stock"), Some(&json!(3)));
    Ok(())
}

#[tokio::test]
async fn test_decrement_inventory_clamps_at_zero() -> anyhow::Result<()> {
    let (_store, records) = seeded_records(&[("p1", 1)]).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let report = workflow.decrement_inventory(&line_items(&[("p1", 5)])?).await?;

    assert_eq!(report.adjustments[0].change, StockChange { previous: 1, current: 0 });
    assert_eq!(report.clamped().count(), 1);

    let p1 = records.get_doc(PRODUCTS, "p1").await?.expect("p1 exists");
    assert_eq!(p1.get("stock"), Some(&json!(0)));
    Ok(())
}

#[tokio::test]
async fn test_decrement_inventory_skips_missing_products() -> anyhow::Result<()> {
    let (store, records) = seeded_records(&[("p2", 4)]).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let report = workflow.decrement_inventory(&line_items(&[("ghost", 1), ("p2", 1)])?).await?;

    assert_eq!(report.skipped, vec![DocumentId::new("ghost")?]);
    assert_eq!(report.adjustments.len(), 1);
    assert!(!report.is_complete());

    assert!(records.get_doc(PRODUCTS, "ghost").await?.is_none());
    assert_eq!(store.document_count(&CollectionName::products()), 1);

    let p2 = records.get_doc(PRODUCTS, "p2").await?.expect("p2 exists");
    assert_eq!(p2.get("stock"), Some(&json!(3)));
    Ok(())
}

#[tokio::test]
async fn test_decrement_inventory_reads_malformed_stock_as_zero() -> anyhow::Result<()> {
    let (store, records) = seeded_records(&[]).await?;
    seed_product(store.as_ref(), "p1", "Té", 2.5, json!("muchos")).await?;
    seed_product(store.as_ref(), "p2", "Pan", 1.0, json!("8")).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let report = workflow.decrement_inventory(&line_items(&[("p1", 1), ("p2", 2)])?).await?;

    assert_eq!(report.adjustments[0].change, StockChange { previous: 0, current: 0 });
    assert_eq!(report.adjustments[1].change, StockChange { previous: 8, current: 6 });
    Ok(())
}

#[tokio::test]
async fn test_decrement_inventory_partial_failure_keeps_earlier_adjustments() -> anyhow::Result<()> {
    let store = Arc::new(FaultyStore::new());
    seed_product(store.inner(), "p1", "Café", 3.0, json!(5)).await?;
    let broken = seed_product(store.inner(), "p2", "Leche", 1.5, json!(5)).await?;
    seed_product(store.inner(), "p3", "Pan", 1.0, json!(5)).await?;
    store.fail_document(&broken);

    let workflow = OrderWorkflow::new(Records::new(store.clone()));
    let result = workflow.decrement_inventory(&line_items(&[("p1", 2), ("p2", 2), ("p3", 2)])?).await;

    match result {
        Err(OrderError::Inventory { product_id, applied, source }) => {
            assert_eq!(product_id, broken);
            assert_eq!(applied.len(), 1);
            assert_eq!(applied[0].product_id.as_str(), "p1");
            assert!(matches!(source, StoreError::Connection(_)));
        },
        other => panic!("expected inventory error, got {:?}", other),
    }

    let products = CollectionName::products();
    let p1 = store.inner().find(&products, &DocumentId::new("p1")?).await?.expect("p1 exists");
    assert_eq!(p1.get("stock"), Some(&json!(3)));
    let p3 = store.inner().find(&products, &DocumentId::new("p3")?).await?.expect("p3 exists");
    assert_eq!(p3.get("stock"), Some(&json!(5)));
    Ok(())
}

#[tokio::test]
async fn test_checkout_saves_and_decrements() -> anyhow::Result<()> {
    let (store, records) = seeded_records(&[("p1", 5)]).await?;
    let workflow = OrderWorkflow::new(records);

    let request: CheckoutRequest = serde_json::from_value(json!({
        "cliente_id": "c1",
        "cliente": {"nombre": "Ana"},
        "items": [{"id": "p1", "cantidad": 2}, {"id": "ghost", "cantidad": "1"}],
        "total": 19.98
    }))?;

    let receipt = workflow.checkout(request).await?;

    assert_eq!(store.document_count(&CollectionName::orders()), 1);
    assert_eq!(receipt.inventory.adjustments[0].change, StockChange { previous: 5, current: 3 });
    assert_eq!(receipt.inventory.skipped, vec![DocumentId::new("ghost")?]);

    let order = store
        .find(&CollectionName::orders(), &receipt.order_id)
        .await?
        .expect("order stored");
    assert_eq!(order.get("total"), Some(&json!(19.98)));
    Ok(())
}

#[tokio::test]
async fn test_checkout_does_not_touch_stock_when_order_fails() -> anyhow::Result<()> {
    let store = Arc::new(FaultyStore::new());
    seed_product(store.inner(), "p1", "Café", 3.0, json!(5)).await?;
    store.fail_collection(&CollectionName::orders());

    let workflow = OrderWorkflow::new(Records::new(store.clone()));
    let request = CheckoutRequest {
        customer_id: "c1".to_string(),
        customer: Default::default(),
        items: line_items(&[("p1", 2)])?,
        total: 6.0,
    };

    assert!(workflow.checkout(request).await.is_err());

    let p1 = store
        .inner()
        .find(&CollectionName::products(), &DocumentId::new("p1")?)
        .await?
        .expect("p1 exists");
    assert_eq!(p1.get("stock"), Some(&json!(5)));
    Ok(())
}

#[tokio::test]
async fn test_get_all_distinguishes_outage_from_empty() -> anyhow::Result<()> {
    let (_store, empty) = seeded_records(&[]).await?;
    assert!(empty.get_all(PRODUCTS).await?.is_empty());

    let down = Records::new(Arc::new(FailingStore));
    assert!(down.get_all(PRODUCTS).await.is_err());
    assert!(down.get_all_or_empty(PRODUCTS).await.is_empty());
    Ok(())
}
