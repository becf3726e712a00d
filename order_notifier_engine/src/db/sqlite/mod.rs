mod errors;
mod sqlite_impl;

pub mod changes;
pub mod orders;

pub use errors::SqliteDatabaseError;
pub use sqlite_impl::SqliteDatabase;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
