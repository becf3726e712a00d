use order_notifier_engine::db_types::{NotificationStatus, OrderId, OrderRecord};
use serde::{Deserialize, Serialize};

/// A stored order without the raw marketplace documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub purchase_date: String,
    pub product_asin: String,
    pub order_qty: i64,
    pub status: NotificationStatus,
    pub recorded_at: String,
}

impl From<&OrderRecord> for OrderSummary {
    fn from(record: &OrderRecord) -> Self {
        Self {
            order_id: record.order_id.clone(),
            purchase_date: record.purchase_date.to_rfc3339(),
            product_asin: record.product_asin.clone(),
            order_qty: record.order_qty,
            status: record.notification_status(),
            recorded_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedOrders {
    pub count: usize,
    pub orders: Vec<OrderSummary>,
}

impl FailedOrders {
    pub fn new(records: &[OrderRecord]) -> Self {
        let orders = records.iter().map(OrderSummary::from).collect::<Vec<_>>();
        Self { count: orders.len(), orders }
    }
}
