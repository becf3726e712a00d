//! The public API of the engine.
//!
//! * [`intake_api::IntakeApi`] polls an order source and records new orders.
//! * [`dispatch_api::DispatchApi`] reacts to change feed entries by sending notifications.
//!
//! Both are constructed per invocation with explicitly supplied collaborators; neither holds any state of its own
//! between calls.
pub mod dispatch_api;
pub mod errors;
pub mod intake_api;
pub mod order_objects;
