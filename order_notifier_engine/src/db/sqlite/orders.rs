use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::InsertOrderResult},
    db_types::{NewOrderRecord, OrderId, OrderRecord},
};

#[derive(Debug, Clone, FromRow)]
struct OrderRow {
    order_id: String,
    purchase_date: DateTime<Utc>,
    product_asin: String,
    order_qty: i64,
    order_raw: String,
    order_items_raw: String,
    notified: bool,
    failed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = SqliteDatabaseError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_raw = serde_json::from_str(&row.order_raw)
            .map_err(|e| SqliteDatabaseError::DataError(format!("order_raw for {}: {e}", row.order_id)))?;
        let order_items_raw = serde_json::from_str(&row.order_items_raw)
            .map_err(|e| SqliteDatabaseError::DataError(format!("order_items_raw for {}: {e}", row.order_id)))?;
        Ok(Self {
            order_id: OrderId(row.order_id),
            purchase_date: row.purchase_date,
            product_asin: row.product_asin,
            order_qty: row.order_qty,
            order_raw,
            order_items_raw,
            notified: row.notified,
            failed: row.failed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = "order_id, purchase_date, product_asin, order_qty, order_raw, order_items_raw, notified, \
                             failed, created_at, updated_at";

/// Inserts the order unless a row with the same `order_id` already exists. This is a single statement, so the
/// existence check and the write cannot interleave with another writer.
pub async fn insert_if_absent(
    order: NewOrderRecord,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO orders (
                order_id,
                purchase_date,
                product_asin,
                order_qty,
                order_raw,
                order_items_raw
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (order_id) DO NOTHING;
        "#,
    )
    .bind(order.order_id.as_str())
    .bind(order.purchase_date)
    .bind(&order.product_asin)
    .bind(order.order_qty)
    .bind(order.order_raw.to_string())
    .bind(order.order_items_raw.to_string())
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        trace!("🗃️ Order {} already exists. Nothing was written", order.order_id);
        Ok(InsertOrderResult::AlreadyExists(order.order_id))
    } else {
        debug!("🗃️ Order {} has been saved", order.order_id);
        Ok(InsertOrderResult::Inserted(order.order_id))
    }
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRecord>, SqliteDatabaseError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1");
    let row = sqlx::query_as::<_, OrderRow>(&sql).bind(order_id.as_str()).fetch_optional(conn).await?;
    row.map(OrderRecord::try_from).transpose()
}

pub async fn fetch_failed_orders(conn: &mut SqliteConnection) -> Result<Vec<OrderRecord>, SqliteDatabaseError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE failed AND NOT notified ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, OrderRow>(&sql).fetch_all(conn).await?;
    rows.into_iter().map(OrderRecord::try_from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFlag {
    Notified,
    Failed,
}

/// Sets one of the notification flags on an existing order.
pub async fn set_flag(
    order_id: &OrderId,
    flag: OrderFlag,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let sql = match flag {
        OrderFlag::Notified => {
            "UPDATE orders SET notified = TRUE, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE order_id = $1"
        },
        OrderFlag::Failed => {
            "UPDATE orders SET failed = TRUE, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE order_id = $1"
        },
    };
    let result = sqlx::query(sql).bind(order_id.as_str()).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::OrderNotFound(order_id.clone()));
    }
    debug!("🗃️ Order {order_id} flagged as {flag:?}");
    Ok(())
}
