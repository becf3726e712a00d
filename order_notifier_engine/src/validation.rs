//! Record shape validation.
//!
//! Typed projections between the order source, the record store and the notification payload. Missing data fails
//! here, with a [`RecordShapeError`], rather than deep inside intake or dispatch.
use std::fmt::Display;

use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::{ChangeEvent, NewOrderRecord, OrderId, OrderRecord},
    traits::{SourceOrder, SourceOrderItems},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordShapeError {
    #[error("The order has an empty order id")]
    EmptyOrderId,
    #[error("Order {0} has no line items")]
    NoLineItems(OrderId),
    #[error("The first line item of order {0} has no product identifier")]
    MissingProduct(OrderId),
    #[error("Change #{0} for order {1} carries no record image")]
    MissingImage(i64, OrderId),
}

/// Builds the record that intake writes for an order.
///
/// Only the first line item is denormalised into `product_asin` and `order_qty`. Orders with several line items
/// still keep all of them in `order_items_raw`.
pub fn build_order_record(order: &SourceOrder, items: &SourceOrderItems) -> Result<NewOrderRecord, RecordShapeError> {
    if order.order_id.as_str().trim().is_empty() {
        return Err(RecordShapeError::EmptyOrderId);
    }
    let first = items.items.first().ok_or_else(|| RecordShapeError::NoLineItems(order.order_id.clone()))?;
    if first.asin.trim().is_empty() {
        return Err(RecordShapeError::MissingProduct(order.order_id.clone()));
    }
    if items.items.len() > 1 {
        debug!(
            "Order {} has {} line items. Only the first ({}) is used for the notification",
            order.order_id,
            items.items.len(),
            first.asin
        );
    }
    Ok(NewOrderRecord {
        order_id: order.order_id.clone(),
        purchase_date: order.purchase_date,
        product_asin: first.asin.clone(),
        order_qty: i64::from(first.quantity),
        order_raw: order.raw.clone(),
        order_items_raw: items.raw.clone(),
    })
}

/// What a notification says about an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub order_id: OrderId,
    pub asin: String,
    pub order_qty: i64,
}

impl NotificationPayload {
    pub fn message(&self) -> String {
        format!("New order for {} x {} ({})", self.order_qty, self.asin, self.order_id)
    }
}

impl Display for NotificationPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} x {}", self.order_id, self.order_qty, self.asin)
    }
}

impl From<&OrderRecord> for NotificationPayload {
    fn from(record: &OrderRecord) -> Self {
        Self { order_id: record.order_id.clone(), asin: record.product_asin.clone(), order_qty: record.order_qty }
    }
}

impl TryFrom<&ChangeEvent> for NotificationPayload {
    type Error = RecordShapeError;

    fn try_from(event: &ChangeEvent) -> Result<Self, Self::Error> {
        event
            .new_image
            .as_ref()
            .map(NotificationPayload::from)
            .ok_or_else(|| RecordShapeError::MissingImage(event.sequence, event.order_id.clone()))
    }
}
