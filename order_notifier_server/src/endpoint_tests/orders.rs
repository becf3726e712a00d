use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use order_notifier_engine::{
    db_types::{OrderId, OrderRecord},
    RecordStoreError,
};
use serde_json::{json, Value};

use super::{helpers::get_request, mocks::MockStore};
use crate::routes::{FailedOrdersRoute, OrderByIdRoute};

fn record(order_id: &str, notified: bool, failed: bool) -> OrderRecord {
    let purchased = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let recorded = Utc.with_ymd_and_hms(2024, 5, 1, 10, 5, 0).unwrap();
    OrderRecord {
        order_id: OrderId::new(order_id),
        purchase_date: purchased,
        product_asin: "B00TEST001".into(),
        order_qty: 3,
        order_raw: json!({"AmazonOrderId": order_id}),
        order_items_raw: json!([{"ASIN": "B00TEST001", "QuantityOrdered": "3"}]),
        notified,
        failed,
        created_at: recorded,
        updated_at: recorded,
    }
}

fn configure_store(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(store))
            .service(FailedOrdersRoute::<MockStore>::new())
            .service(OrderByIdRoute::<MockStore>::new());
    }
}

#[actix_web::test]
async fn fetch_failed_orders() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_failed_orders().returning(|| Ok(vec![record("A1", false, true), record("A9", false, true)]));
    let (status, body) = get_request("/orders/failed", configure_store(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["orders"][0]["order_id"], "A1");
    assert_eq!(body["orders"][0]["status"], "Failed");
    assert_eq!(body["orders"][0]["product_asin"], "B00TEST001");
    assert_eq!(body["orders"][0]["order_qty"], 3);
    assert_eq!(body["orders"][0]["purchase_date"], "2024-05-01T10:00:00+00:00");
    assert_eq!(body["orders"][1]["order_id"], "A9");
}

#[actix_web::test]
async fn fetch_failed_orders_when_there_are_none() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_failed_orders().returning(|| Ok(vec![]));
    let (status, body) = get_request("/orders/failed", configure_store(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"count":0,"orders":[]}"#);
}

#[actix_web::test]
async fn fetch_failed_orders_backend_error() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_failed_orders().returning(|| Err(RecordStoreError::DatabaseError("disk I/O error".into())));
    let (status, body) = get_request("/orders/failed", configure_store(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("disk I/O error"), "{body}");
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_order()
        .withf(|id| id.as_str() == "902-3159896-1390916")
        .returning(|id| Ok(Some(record(id.as_str(), true, false))));
    let (status, body) =
        get_request("/order/902-3159896-1390916", configure_store(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["order_id"], "902-3159896-1390916");
    assert_eq!(body["status"], "Notified");
    assert_eq!(body["recorded_at"], "2024-05-01T10:05:00+00:00");
}

#[actix_web::test]
async fn fetch_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order().returning(|_| Ok(None));
    let (status, body) = get_request("/order/nope", configure_store(store)).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order nope"}"#);
}
