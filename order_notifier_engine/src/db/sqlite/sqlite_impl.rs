//! `SqliteDatabase` is a concrete implementation of an order record store.
//!
//! It uses SQLite as the backend and implements both [`RecordStore`] and [`ChangeFeed`]. The change feed is written
//! by triggers on the `orders` table, so every mutation, no matter who makes it, shows up in the feed in the same
//! transaction as the mutation itself.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::{changes, new_pool, orders, orders::OrderFlag, SqliteDatabaseError};
use crate::{
    db::traits::{ChangeFeed, InsertOrderResult, RecordStore, RecordStoreError},
    db_types::{ChangeEvent, NewOrderRecord, OrderId, OrderRecord},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Creates the database file if it does not exist yet.
    pub async fn create_if_missing(url: &str) -> Result<(), SqliteDatabaseError> {
        if !Sqlite::database_exists(url).await? {
            Sqlite::create_database(url).await?;
            info!("🗃️ Created Sqlite database {url}");
        }
        Ok(())
    }

    /// Brings the schema up to date.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), SqliteDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

impl RecordStore for SqliteDatabase {
    async fn insert_if_absent(&self, order: NewOrderRecord) -> Result<InsertOrderResult, RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::insert_if_absent(order, &mut conn).await?;
        Ok(result)
    }

    async fn mark_notified(&self, order_id: &OrderId) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_flag(order_id, OrderFlag::Notified, &mut conn).await?;
        Ok(())
    }

    async fn mark_failed(&self, order_id: &OrderId) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_flag(order_id, OrderFlag::Failed, &mut conn).await?;
        Ok(())
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_failed_orders(&self) -> Result<Vec<OrderRecord>, RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_failed_orders(&mut conn).await?;
        Ok(orders)
    }
}

impl ChangeFeed for SqliteDatabase {
    async fn fetch_changes(&self, after_sequence: i64, limit: u32) -> Result<Vec<ChangeEvent>, RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        let changes = changes::fetch_changes(after_sequence, limit, &mut conn).await?;
        Ok(changes)
    }

    async fn load_cursor(&self, consumer: &str) -> Result<i64, RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        let sequence = changes::load_cursor(consumer, &mut conn).await?;
        Ok(sequence)
    }

    async fn save_cursor(&self, consumer: &str, sequence: i64) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.acquire().await?;
        changes::save_cursor(consumer, sequence, &mut conn).await?;
        trace!("🗃️ Feed cursor for {consumer} saved at #{sequence}");
        Ok(())
    }
}
