use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("The notification was rejected with status {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("The notification could not be sent. {0}")]
    Transport(String),
}

/// Somewhere to send human-readable "new order" messages.
///
/// `send_message` must only return `Ok` when the sink acknowledged the message with a success status.
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn send_message(&self, message: &str) -> Result<(), NotificationError>;
}
