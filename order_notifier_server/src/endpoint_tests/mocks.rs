use mockall::mock;
use order_notifier_engine::{
    db_types::{NewOrderRecord, OrderId, OrderRecord},
    InsertOrderResult,
    RecordStore,
    RecordStoreError,
};

mock! {
    pub Store {}
    impl RecordStore for Store {
        async fn insert_if_absent(&self, order: NewOrderRecord) -> Result<InsertOrderResult, RecordStoreError>;
        async fn mark_notified(&self, order_id: &OrderId) -> Result<(), RecordStoreError>;
        async fn mark_failed(&self, order_id: &OrderId) -> Result<(), RecordStoreError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, RecordStoreError>;
        async fn fetch_failed_orders(&self) -> Result<Vec<OrderRecord>, RecordStoreError>;
    }
}
