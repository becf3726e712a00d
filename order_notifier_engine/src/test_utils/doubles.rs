use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::{
    db_types::OrderId,
    traits::{
        NotificationError,
        NotificationSink,
        OrderSource,
        OrderSourceError,
        SourceHealth,
        SourceOrder,
        SourceOrderItem,
        SourceOrderItems,
        SourceOrderStatus,
    },
};

pub fn purchase_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

pub fn source_order(order_id: &str, status: &str) -> SourceOrder {
    SourceOrder {
        order_id: OrderId::new(order_id),
        purchase_date: purchase_date(),
        status: status.parse::<SourceOrderStatus>().unwrap(),
        raw: json!({"AmazonOrderId": order_id, "OrderStatus": status, "PurchaseDate": "2024-05-01T10:00:00Z"}),
    }
}

pub fn source_items(items: &[(&str, u32)]) -> SourceOrderItems {
    let raw = items.iter().map(|(asin, qty)| json!({"ASIN": asin, "QuantityOrdered": qty})).collect::<Vec<_>>();
    let items = items.iter().map(|(asin, qty)| SourceOrderItem { asin: asin.to_string(), quantity: *qty }).collect();
    SourceOrderItems { items, raw: json!(raw) }
}

#[derive(Debug, Default)]
struct SourceState {
    unhealthy: Option<String>,
    listing_error: Option<String>,
    orders: Vec<SourceOrder>,
    items: HashMap<OrderId, SourceOrderItems>,
    failing_items: HashSet<OrderId>,
    item_requests: Vec<OrderId>,
    listings: usize,
}

/// An order source that serves whatever orders it has been given.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderSource {
    state: Arc<Mutex<SourceState>>,
}

impl MemoryOrderSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_order(&self, order_id: &str, status: &str, items: &[(&str, u32)]) {
        let mut state = self.state.lock().unwrap();
        state.orders.push(source_order(order_id, status));
        state.items.insert(OrderId::new(order_id), source_items(items));
    }

    pub fn clear_orders(&self) {
        self.state.lock().unwrap().orders.clear();
    }

    pub fn set_unhealthy(&self, reason: &str) {
        self.state.lock().unwrap().unhealthy = Some(reason.to_string());
    }

    pub fn fail_listing(&self, reason: &str) {
        self.state.lock().unwrap().listing_error = Some(reason.to_string());
    }

    pub fn fail_items_for(&self, order_id: &str) {
        self.state.lock().unwrap().failing_items.insert(OrderId::new(order_id));
    }

    pub fn item_requests(&self) -> Vec<OrderId> {
        self.state.lock().unwrap().item_requests.clone()
    }

    pub fn listings(&self) -> usize {
        self.state.lock().unwrap().listings
    }
}

impl OrderSource for MemoryOrderSource {
    async fn health(&self) -> Result<SourceHealth, OrderSourceError> {
        let state = self.state.lock().unwrap();
        Ok(match &state.unhealthy {
            Some(reason) => SourceHealth::Unhealthy(reason.clone()),
            None => SourceHealth::Healthy,
        })
    }

    async fn orders_updated_since(
        &self,
        _cutoff: DateTime<Utc>,
        _marketplace_ids: &[String],
    ) -> Result<Vec<SourceOrder>, OrderSourceError> {
        let mut state = self.state.lock().unwrap();
        state.listings += 1;
        match &state.listing_error {
            Some(reason) => Err(OrderSourceError::QueryError(reason.clone())),
            None => Ok(state.orders.clone()),
        }
    }

    async fn order_items(&self, order_id: &OrderId) -> Result<SourceOrderItems, OrderSourceError> {
        let mut state = self.state.lock().unwrap();
        state.item_requests.push(order_id.clone());
        if state.failing_items.contains(order_id) {
            return Err(OrderSourceError::Unavailable(format!("items for {order_id} are unavailable")));
        }
        Ok(state.items.get(order_id).cloned().unwrap_or_else(|| source_items(&[])))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SinkMode {
    #[default]
    Accept,
    Reject(u16),
    Unreachable,
}

/// A notification sink that records every message it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
    mode: Arc<Mutex<SinkMode>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All later sends are rejected with the given status.
    pub fn reject_with(&self, status: u16) {
        *self.mode.lock().unwrap() = SinkMode::Reject(status);
    }

    /// All later sends fail before a response is received.
    pub fn fail_transport(&self) {
        *self.mode.lock().unwrap() = SinkMode::Unreachable;
    }

    pub fn accept_all(&self) {
        *self.mode.lock().unwrap() = SinkMode::Accept;
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl NotificationSink for RecordingSink {
    async fn send_message(&self, message: &str) -> Result<(), NotificationError> {
        self.messages.lock().unwrap().push(message.to_string());
        let mode = *self.mode.lock().unwrap();
        match mode {
            SinkMode::Accept => Ok(()),
            SinkMode::Reject(status) => {
                Err(NotificationError::Rejected { status, message: "rejected by test sink".into() })
            },
            SinkMode::Unreachable => Err(NotificationError::Transport("connection refused by test sink".into())),
        }
    }
}
