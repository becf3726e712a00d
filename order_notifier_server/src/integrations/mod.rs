//! Adapters that plug external services into the engine's collaborator traits.
//!
//! * [`mws::MwsOrderSource`] is the [`order_notifier_engine::OrderSource`] backed by the marketplace Orders API.
//! * [`slack::SlackWebhook`] is the [`order_notifier_engine::NotificationSink`] backed by a chat incoming webhook.
pub mod mws;
pub mod slack;
