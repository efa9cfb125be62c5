//! Concurrent checkouts against one shared store handle.

use serde_json::json;

use tienda_domain::{CollectionName, PRODUCTS};
use tienda_orders::OrderWorkflow;
use tienda_testkit::{line_items, seeded_records};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_decrements_do_not_lose_updates() -> anyhow::Result<()> {
    let (_store, records) = seeded_records(&[("p1", 5)]).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let first = {
        let workflow = workflow.clone();
        let items = line_items(&[("p1", 3)])?;
        tokio::spawn(async move { workflow.decrement_inventory(&items).await })
    };
    let second = {
        let workflow = workflow.clone();
        let items = line_items(&[("p1", 3)])?;
        tokio::spawn(async move { workflow.decrement_inventory(&items).await })
    };

    let first = first.await??;
    let second = second.await??;

    let p1 = records.get_doc(PRODUCTS, "p1").await?.expect("p1 exists");
    assert_eq!(p1.get("stock"), Some(&json!(0)));

    // Exactly one of the two saw the full stock.
    let mut previous = [first.adjustments[0].change.previous, second.adjustments[0].change.previous];
    previous.sort_unstable();
    assert_eq!(previous, [2, 5]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_checkouts_share_one_store() -> anyhow::Result<()> {
    let (store, records) = seeded_records(&[("p1", 50), ("p2", 50)]).await?;
    let workflow = OrderWorkflow::new(records.clone());

    let mut handles = Vec::new();
    for n in 0..20 {
        let workflow = workflow.clone();
        let items = line_items(&[("p1", 2), ("p2", 1)])?;
        handles.push(tokio::spawn(async move {
            let customer = format!("c{}", n);
            let order_id = workflow.save_order(&customer, Default::default(), items.clone(), 5.0).await?;
            workflow.decrement_inventory(&items).await?;
            Ok::<_, tienda_orders::OrderError>(order_id)
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(store.document_count(&CollectionName::orders()), 20);
    let p1 = records.get_doc(PRODUCTS, "p1").await?.expect("p1 exists");
    assert_eq!(p1.get("stock"), Some(&json!(10)));
    let p2 = records.get_doc(PRODUCTS, "p2").await?.expect("p2 exists");
    assert_eq!(p2.get("stock"), Some(&json!(30)));
    Ok(())
}
