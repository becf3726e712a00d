//! Contracts for the external collaborators of the engine.
//!
//! * [`OrderSource`] is where orders come from: a marketplace API, or a test double.
//! * [`NotificationSink`] is where "new order" messages go.
//!
//! Adapters for concrete services live outside the engine.
mod notification_sink;
mod order_source;

pub use notification_sink::{NotificationError, NotificationSink};
pub use order_source::{
    OrderSource,
    OrderSourceError,
    SourceHealth,
    SourceOrder,
    SourceOrderItem,
    SourceOrderItems,
    SourceOrderStatus,
};
