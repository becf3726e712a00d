use thiserror::Error;

use crate::{
    db::traits::InsertOrderResult,
    db_types::{NewOrderRecord, OrderId, OrderRecord},
};

#[derive(Debug, Clone, Error)]
pub enum RecordStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist in the record store")]
    OrderNotFound(OrderId),
    #[error("The stored data is malformed. {0}")]
    DataError(String),
}

/// Keyed access to order records.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Inserts the record only if no record with the same `order_id` exists. This must be atomic with respect to the
    /// uniqueness check. An existing record is never overwritten; `AlreadyExists` is returned instead.
    async fn insert_if_absent(&self, order: NewOrderRecord) -> Result<InsertOrderResult, RecordStoreError>;

    /// Sets `notified = true`. Returns `OrderNotFound` if there is no such record.
    async fn mark_notified(&self, order_id: &OrderId) -> Result<(), RecordStoreError>;

    /// Sets `failed = true`. Returns `OrderNotFound` if there is no such record.
    async fn mark_failed(&self, order_id: &OrderId) -> Result<(), RecordStoreError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, RecordStoreError>;

    /// Orders whose notification failed and has not since succeeded, oldest first.
    async fn fetch_failed_orders(&self) -> Result<Vec<OrderRecord>, RecordStoreError>;
}
