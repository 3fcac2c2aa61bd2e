//! End-to-end fulfillment against an on-disk SQLite database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use warehouse_fulfillment::config::{Config, PersistenceConfig};
use warehouse_fulfillment::domain::inventory::{Product, ReconstitutedOrderParams};
use warehouse_fulfillment::{
    Container, ErrorCode, FulfillOrderCommand, FulfillOrderRequestDto, FulfillmentError,
    FulfillmentService, InMemoryWarehouseStore, Money, OrderId, ProductId, Quantity,
    ServiceError, SqliteWarehouseStore, Timestamp, WarehouseId,
};

const T0: &str = "2025-03-01T09:00:00Z";
const T1: &str = "2025-03-01T10:00:00Z";

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

/// Product{1, 10.00}, Warehouse{1}, Order{5, product 1, amount 3, T0}.
async fn setup(dir: &TempDir) -> Container<SqliteWarehouseStore> {
    let config = Config {
        persistence: PersistenceConfig {
            database_url: format!("sqlite://{}", dir.path().join("warehouse.db").display()),
            max_connections: 4,
            ..PersistenceConfig::default()
        },
        ..Config::default()
    };
    let container = Container::sqlite(config).await.unwrap();
    let store = container.store();

    store
        .insert_product(&Product::new(ProductId::new(1), Money::new(dec!(10.00))))
        .await
        .unwrap();
    store.insert_warehouse(WarehouseId::new(1)).await.unwrap();
    store
        .insert_order(&ReconstitutedOrderParams {
            id: OrderId::new(5),
            product_id: ProductId::new(1),
            amount: Quantity::new(3),
            created_at: ts(T0),
            fulfilled_at: None,
        })
        .await
        .unwrap();

    container
}

fn command(product: i64, warehouse: i64, amount: i64) -> FulfillOrderCommand {
    FulfillOrderCommand {
        product_id: ProductId::new(product),
        warehouse_id: WarehouseId::new(warehouse),
        amount: Quantity::new(amount),
        requested_at: ts(T1),
    }
}

#[tokio::test]
async fn worked_example_then_retry_conflicts() {
    let dir = TempDir::new().unwrap();
    let container = setup(&dir).await;
    let use_case = container.fulfill_order_use_case();
    let store = container.store();

    let receipt = use_case.execute(command(1, 1, 3)).await.unwrap();
    assert_eq!(receipt.order_id, OrderId::new(5));

    let movements = store.movements_for_order(OrderId::new(5)).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].id, receipt.movement_id);
    assert_eq!(movements[0].warehouse_id, WarehouseId::new(1));
    assert_eq!(movements[0].amount, Quantity::new(3));
    assert_eq!(movements[0].total_price.to_string(), "30.00");

    let order = store.find_order(OrderId::new(5)).await.unwrap().unwrap();
    assert_eq!(order.fulfilled_at(), Some(receipt.fulfilled_at));

    let retry = use_case.execute(command(1, 1, 3)).await.unwrap_err();
    assert!(matches!(retry, FulfillmentError::Conflict { .. }));
    assert_eq!(ServiceError::from(&retry).code(), ErrorCode::OrderAlreadyFulfilled);
    assert_eq!(store.count_movements().await.unwrap(), 1);
}

#[tokio::test]
async fn rejected_requests_write_nothing() {
    let dir = TempDir::new().unwrap();
    let container = setup(&dir).await;
    let use_case = container.fulfill_order_use_case();
    let store = container.store();

    let cases = [
        (command(1, 1, 0), ErrorCode::InvalidInput),
        (command(9, 1, 3), ErrorCode::ProductNotFound),
        (command(1, 9, 3), ErrorCode::WarehouseNotFound),
        (command(1, 1, 4), ErrorCode::NoMatchingOrder),
    ];

    for (cmd, expected) in cases {
        let err = use_case.execute(cmd).await.unwrap_err();
        assert_eq!(err.error_code(), expected, "{err}");
    }

    assert_eq!(store.count_movements().await.unwrap(), 0);
    let order = store.find_order(OrderId::new(5)).await.unwrap().unwrap();
    assert!(order.is_pending());
}

#[tokio::test]
async fn order_fulfilled_elsewhere_is_conflict() {
    let dir = TempDir::new().unwrap();
    let container = setup(&dir).await;
    let store = container.store();
    store
        .insert_product(&Product::new(ProductId::new(2), Money::new(dec!(1.25))))
        .await
        .unwrap();
    store
        .insert_order(&ReconstitutedOrderParams {
            id: OrderId::new(6),
            product_id: ProductId::new(2),
            amount: Quantity::new(1),
            created_at: ts(T0),
            fulfilled_at: Some(ts(T0)),
        })
        .await
        .unwrap();

    let err = container
        .fulfill_order_use_case()
        .execute(command(2, 1, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, FulfillmentError::Conflict { .. }));
    assert_eq!(store.count_movements().await.unwrap(), 0);
}

#[tokio::test]
async fn order_for_unknown_product_is_rejected_by_storage() {
    let dir = TempDir::new().unwrap();
    let container = setup(&dir).await;

    let err = container
        .store()
        .insert_order(&ReconstitutedOrderParams {
            id: OrderId::new(7),
            product_id: ProductId::new(99),
            amount: Quantity::new(1),
            created_at: ts(T0),
            fulfilled_at: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, warehouse_fulfillment::StorageError::Integrity(_)));
}

#[tokio::test]
async fn sub_microsecond_later_request_matches_on_both_stores() {
    let mut cmd = command(1, 1, 3);
    cmd.requested_at = ts("2025-03-01T09:00:00.0000005Z");

    let dir = TempDir::new().unwrap();
    let sqlite = setup(&dir).await;
    let on_disk = sqlite.fulfill_order_use_case().execute(cmd).await.unwrap();

    let memory: Container<InMemoryWarehouseStore> = Container::in_memory(Config::default());
    let store = memory.store();
    store
        .insert_product(Product::new(ProductId::new(1), Money::new(dec!(10.00))))
        .await;
    store.insert_warehouse(WarehouseId::new(1)).await;
    store
        .insert_order(ReconstitutedOrderParams {
            id: OrderId::new(5),
            product_id: ProductId::new(1),
            amount: Quantity::new(3),
            created_at: ts(T0),
            fulfilled_at: None,
        })
        .await
        .unwrap();
    let in_ram = memory.fulfill_order_use_case().execute(cmd).await.unwrap();

    assert_eq!(on_disk.order_id, OrderId::new(5));
    assert_eq!(in_ram.order_id, OrderId::new(5));
}

#[tokio::test]
async fn request_at_order_creation_time_does_not_match_on_sqlite() {
    let mut cmd = command(1, 1, 3);
    cmd.requested_at = ts(T0);

    let dir = TempDir::new().unwrap();
    let err = setup(&dir)
        .await
        .fulfill_order_use_case()
        .execute(cmd)
        .await
        .unwrap_err();

    assert!(matches!(err, FulfillmentError::NoMatchingOrder { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_fulfil_once() {
    let dir = TempDir::new().unwrap();
    let container = setup(&dir).await;
    let use_case = Arc::new(container.fulfill_order_use_case());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let use_case = Arc::clone(&use_case);
            tokio::spawn(async move { use_case.execute(command(1, 1, 3)).await })
        })
        .collect();

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(FulfillmentError::Conflict { .. })))
        .count();

    assert_eq!(successes, 1, "{results:?}");
    assert_eq!(conflicts, 7, "{results:?}");
    assert_eq!(container.store().count_movements().await.unwrap(), 1);
}

#[tokio::test]
async fn service_port_accepts_json_request() {
    let dir = TempDir::new().unwrap();
    let container = setup(&dir).await;
    let service: Arc<dyn FulfillmentService> = Arc::new(container.fulfill_order_use_case());

    let request: FulfillOrderRequestDto = serde_json::from_str(
        r#"{"productId":1,"warehouseId":1,"amount":3,"createdAt":"2025-03-01T10:00:00Z"}"#,
    )
    .unwrap();

    let response = service.fulfill(request.clone()).await.unwrap();
    let stored = container
        .store()
        .movements_for_order(OrderId::new(5))
        .await
        .unwrap();
    assert_eq!(response.id, stored[0].id.value());

    let err = service.fulfill(request).await.unwrap_err();
    assert_eq!(ServiceError::from(err).to_http_response().status, 409);
}
