//! # Record store contracts
//!
//! The record store is the only integration point between intake and dispatch, and the single source of truth for
//! "has this order been seen" and "has this order been notified".
//!
//! * [`RecordStore`] covers the keyed operations: conditional insert, flag write-backs and lookups.
//! * [`ChangeFeed`] exposes the ordered stream of mutations that the store emits, and remembers how far each consumer
//!   has read.
mod change_feed;
mod data_objects;
mod record_store;

pub use change_feed::ChangeFeed;
pub use data_objects::InsertOrderResult;
pub use record_store::{RecordStore, RecordStoreError};
