//! # Order notifier server
//!
//! This crate wires the order notifier engine to the outside world. It is responsible for:
//! * Polling the marketplace for recently updated orders on a schedule and recording new ones (the intake worker).
//! * Following the record store's change feed and posting a chat message for every new order (the feed worker).
//! * Serving a few read-only status routes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/orders/failed`: Orders whose notification failed. These are not retried automatically.
//! * `/order/{order_id}`: The stored record for a single order.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod feed_worker;
pub mod integrations;
pub mod intake_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
