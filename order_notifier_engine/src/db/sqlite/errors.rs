use thiserror::Error;

use crate::{db::traits::RecordStoreError, db_types::OrderId};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Invalid data in the database: {0}")]
    DataError(String),
}

impl From<SqliteDatabaseError> for RecordStoreError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::OrderNotFound(id) => Self::OrderNotFound(id),
            SqliteDatabaseError::DataError(s) => Self::DataError(s),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for RecordStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
