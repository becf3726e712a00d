use cucumber::{given, then, when};
use order_notifier_engine::{db_types::OrderId, ChangeFeed, IntakeError, RecordStore};

use crate::cucumber::{notifier_world::CONSUMER, NotifierWorld};

#[given(expr = "the marketplace reports order {word} with status {word} for {int} x {word}")]
async fn marketplace_order(world: &mut NotifierWorld, order_id: String, status: String, qty: u32, asin: String) {
    world.system().source.add_order(&order_id, &status, &[(asin.as_str(), qty)]);
}

//  Given the marketplace reports order A7 with status Unshipped for items 'B2:3,B5:1'
#[given(expr = "the marketplace reports order {word} with status {word} for items {string}")]
async fn marketplace_order_with_items(world: &mut NotifierWorld, order_id: String, status: String, items: String) {
    let items = items
        .split(',')
        .map(|item| {
            let (asin, qty) = item.trim().split_once(':').expect("Items must look like ASIN:QTY");
            (asin.to_string(), qty.parse::<u32>().expect("Quantity must be a number"))
        })
        .collect::<Vec<_>>();
    let items = items.iter().map(|(asin, qty)| (asin.as_str(), *qty)).collect::<Vec<_>>();
    world.system().source.add_order(&order_id, &status, &items);
}

#[given("the marketplace is down")]
async fn marketplace_down(world: &mut NotifierWorld) {
    world.system().source.set_unhealthy("RED");
}

#[given(expr = "the line items for order {word} cannot be fetched")]
async fn items_unavailable(world: &mut NotifierWorld, order_id: String) {
    world.system().source.fail_items_for(&order_id);
}

#[given(expr = "the notification sink rejects messages with status {int}")]
async fn sink_rejects(world: &mut NotifierWorld, status: u16) {
    world.system().sink.reject_with(status);
}

#[given("the notification sink cannot be reached")]
async fn sink_unreachable(world: &mut NotifierWorld) {
    world.system().sink.fail_transport();
}

#[given("the notification sink accepts messages")]
async fn sink_accepts(world: &mut NotifierWorld) {
    world.system().sink.accept_all();
}

#[when("the intake job runs")]
async fn intake_runs(world: &mut NotifierWorld) {
    world.system().run_intake().await;
}

#[when("the dispatcher processes the change feed")]
async fn dispatcher_runs(world: &mut NotifierWorld) {
    world.system().drain_feed().await;
}

#[when("the change feed is delivered again from the start")]
async fn feed_redelivered(world: &mut NotifierWorld) {
    world.system().replay_feed().await;
}

#[then("the intake run fails because the marketplace is unavailable")]
async fn intake_failed(world: &mut NotifierWorld) {
    let result = world.system().last_intake.as_ref().expect("Intake has not run");
    assert!(matches!(result, Err(IntakeError::SourceUnavailable(_))), "Unexpected intake result: {result:?}");
}

#[then(expr = "the intake run reports {int} inserted, {int} duplicate(s), {int} cancelled and {int} failed")]
async fn intake_summary(
    world: &mut NotifierWorld,
    inserted: usize,
    duplicates: usize,
    cancelled: usize,
    failed: usize,
) {
    let result = world.system().last_intake.as_ref().expect("Intake has not run");
    let summary = result.as_ref().expect("Intake run failed");
    assert_eq!(summary.inserted, inserted, "inserted");
    assert_eq!(summary.duplicates, duplicates, "duplicates");
    assert_eq!(summary.cancelled, cancelled, "cancelled");
    assert_eq!(summary.failed, failed, "failed");
}

#[then(expr = "the store holds {int} order record(s)")]
async fn record_count(world: &mut NotifierWorld, count: i64) {
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(world.system().db.pool())
        .await
        .expect("Error counting orders");
    assert_eq!(stored, count);
}

#[then(expr = "the change feed holds {int} entry/entries")]
async fn feed_length(world: &mut NotifierWorld, count: usize) {
    let changes = world.system().db.fetch_changes(0, 1000).await.expect("Error reading change feed");
    assert_eq!(changes.len(), count);
}

#[then(expr = "order {word} is recorded for {int} x {word}")]
async fn order_recorded(world: &mut NotifierWorld, order_id: String, qty: i64, asin: String) {
    let order = world.system().db.fetch_order(&OrderId::new(order_id)).await.expect("Error fetching order");
    let order = order.expect("Order does not exist");
    assert_eq!(order.product_asin, asin);
    assert_eq!(order.order_qty, qty);
}

#[then(expr = "order {word} is not recorded")]
async fn order_not_recorded(world: &mut NotifierWorld, order_id: String) {
    let order = world.system().db.fetch_order(&OrderId::new(order_id)).await.expect("Error fetching order");
    assert!(order.is_none(), "Order should not exist");
}

#[then(expr = "order {word} is {word}")]
async fn order_status(world: &mut NotifierWorld, order_id: String, status: String) {
    let order = world.system().db.fetch_order(&OrderId::new(order_id)).await.expect("Error fetching order");
    let order = order.expect("Order does not exist");
    assert_eq!(order.notification_status().to_string(), status);
}

#[then(expr = "the sink received {int} message(s)")]
async fn message_count(world: &mut NotifierWorld, count: usize) {
    assert_eq!(world.system().sink.attempts(), count);
}

#[then(expr = "the sink received the message {string}")]
async fn message_received(world: &mut NotifierWorld, message: String) {
    let messages = world.system().sink.messages();
    assert!(messages.contains(&message), "{message} not in {messages:?}");
}

#[then(expr = "the dispatcher ignored {int} entry/entries and skipped {int} redelivery/redeliveries")]
async fn dispatch_skips(world: &mut NotifierWorld, ignored: usize, redeliveries: usize) {
    let summary = world.system().last_dispatch;
    assert_eq!(summary.ignored, ignored, "ignored");
    assert_eq!(summary.already_handled, redeliveries, "already handled");
}

#[then(expr = "the failed orders list is {string}")]
async fn failed_orders(world: &mut NotifierWorld, expected: String) {
    let failed = world.system().db.fetch_failed_orders().await.expect("Error fetching failed orders");
    let ids = failed.iter().map(|o| o.order_id.as_str()).collect::<Vec<_>>().join(",");
    assert_eq!(ids, expected);
}

#[then(expr = "the dispatcher cursor is at the end of the change feed")]
async fn cursor_at_end(world: &mut NotifierWorld) {
    let db = &world.system().db;
    let cursor = db.load_cursor(CONSUMER).await.expect("Error loading cursor");
    let changes = db.fetch_changes(cursor, 10).await.expect("Error reading change feed");
    assert!(cursor > 0);
    assert!(changes.is_empty(), "{} entries after the cursor", changes.len());
}
