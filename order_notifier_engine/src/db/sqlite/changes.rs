use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{ChangeEvent, ChangeType, OrderId, OrderRecord},
};

#[derive(Debug, Clone, FromRow)]
struct ChangeRow {
    sequence: i64,
    event_type: String,
    order_id: String,
    new_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChangeRow> for ChangeEvent {
    type Error = SqliteDatabaseError;

    fn try_from(row: ChangeRow) -> Result<Self, Self::Error> {
        let event_type = row
            .event_type
            .parse::<ChangeType>()
            .map_err(|e| SqliteDatabaseError::DataError(format!("change #{}: {e}", row.sequence)))?;
        let new_image = row
            .new_image
            .map(|s| serde_json::from_str::<OrderRecord>(&s))
            .transpose()
            .map_err(|e| SqliteDatabaseError::DataError(format!("image for change #{}: {e}", row.sequence)))?;
        Ok(Self {
            sequence: row.sequence,
            event_type,
            order_id: OrderId(row.order_id),
            new_image,
            created_at: row.created_at,
        })
    }
}

pub async fn fetch_changes(
    after_sequence: i64,
    limit: u32,
    conn: &mut SqliteConnection,
) -> Result<Vec<ChangeEvent>, SqliteDatabaseError> {
    let rows = sqlx::query_as::<_, ChangeRow>(
        r#"
            SELECT sequence, event_type, order_id, new_image, created_at
            FROM order_changes
            WHERE sequence > $1
            ORDER BY sequence ASC
            LIMIT $2;
        "#,
    )
    .bind(after_sequence)
    .bind(i64::from(limit))
    .fetch_all(conn)
    .await?;
    rows.into_iter().map(ChangeEvent::try_from).collect()
}

pub async fn load_cursor(consumer: &str, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let sequence = sqlx::query_scalar::<_, i64>("SELECT last_sequence FROM feed_cursors WHERE consumer = $1")
        .bind(consumer)
        .fetch_optional(conn)
        .await?;
    Ok(sequence.unwrap_or(0))
}

/// Stores the consumer's position. The cursor never moves backwards.
pub async fn save_cursor(
    consumer: &str,
    sequence: i64,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        r#"
            INSERT INTO feed_cursors (consumer, last_sequence) VALUES ($1, $2)
            ON CONFLICT (consumer) DO UPDATE SET
                last_sequence = MAX(feed_cursors.last_sequence, excluded.last_sequence),
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now');
        "#,
    )
    .bind(consumer)
    .bind(sequence)
    .execute(conn)
    .await?;
    Ok(())
}
