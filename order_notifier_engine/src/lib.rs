//! Order Notifier Engine
//!
//! The engine contains the two halves of the order notification flow. Neither half talks to the other directly; the
//! record store is the only thing they share.
//!
//! 1. Intake ([`IntakeApi`]). Pulls recently updated orders from an [`OrderSource`] and writes each one into the
//!    [`RecordStore`] exactly once. The store's conditional insert is the deduplication mechanism: the first writer
//!    wins and later attempts for the same order id are quietly ignored.
//! 2. Dispatch ([`DispatchApi`]). Consumes entries from the store's change feed. Only record creations are acted on.
//!    Each one results in a single message to the [`NotificationSink`], and the outcome is written back onto the
//!    record as either the `notified` or the `failed` flag.
//!
//! The database layer ([`mod@db`]) defines the store and change feed contracts, and provides a SQLite backend whose
//! change feed is maintained by triggers.
mod db;

pub mod db_types;
pub mod helpers;
mod ne_api;
pub mod traits;
pub mod validation;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{ChangeFeed, InsertOrderResult, RecordStore, RecordStoreError};
pub use ne_api::{
    dispatch_api::DispatchApi,
    errors::IntakeError,
    intake_api::IntakeApi,
    order_objects::{DispatchSummary, IntakeSummary},
};
pub use traits::{NotificationError, NotificationSink, OrderSource, OrderSourceError};
