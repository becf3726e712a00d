use crate::{db::traits::RecordStoreError, db_types::ChangeEvent};

/// The record store's change feed.
///
/// Every mutation of a record produces one entry. Entries are ordered by `sequence`, so per-key ordering (a creation
/// before any later flag update) holds. Consumers track their own position with a named cursor; delivery is
/// at-least-once because a consumer may process a batch and fail before saving its cursor.
#[allow(async_fn_in_trait)]
pub trait ChangeFeed {
    /// Returns up to `limit` entries with a sequence strictly greater than `after_sequence`, in ascending order.
    async fn fetch_changes(&self, after_sequence: i64, limit: u32) -> Result<Vec<ChangeEvent>, RecordStoreError>;

    /// The last sequence processed by `consumer`, or 0 if it has never saved a cursor.
    async fn load_cursor(&self, consumer: &str) -> Result<i64, RecordStoreError>;

    async fn save_cursor(&self, consumer: &str, sequence: i64) -> Result<(), RecordStoreError>;
}
