use std::time::Duration;

use log::*;
use mon_common::Secret;
use order_notifier_engine::{NotificationError, NotificationSink};
use reqwest::{Client, Url};
use serde_json::json;

use crate::errors::ServerError;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts notification messages to a chat incoming webhook as `{"text": message}`.
#[derive(Clone)]
pub struct SlackWebhook {
    url: Secret<String>,
    client: Client,
}

impl SlackWebhook {
    /// Fails if `url` is empty or is not a valid URL. The error never includes the URL itself.
    pub fn new(url: Secret<String>) -> Result<Self, ServerError> {
        if url.reveal().trim().is_empty() {
            return Err(ServerError::InitializeError("No webhook URL has been configured. Set MON_WEBHOOK_URL.".into()));
        }
        Url::parse(url.reveal())
            .map_err(|e| ServerError::InitializeError(format!("MON_WEBHOOK_URL is not a valid URL. {e}")))?;
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not create webhook client. {e}")))?;
        Ok(Self { url, client })
    }
}

impl NotificationSink for SlackWebhook {
    async fn send_message(&self, message: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.url.reveal())
            .json(&json!({ "text": message }))
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.without_url().to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("📨️ Webhook accepted the message. {status}");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!("📨️ Webhook rejected the message. {status}: {body}");
            Err(NotificationError::Rejected { status: status.as_u16(), message: body })
        }
    }
}
