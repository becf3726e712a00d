use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum OrderSourceError {
    #[error("The order source could not be reached. {0}")]
    Unavailable(String),
    #[error("The order source rejected the query. {0}")]
    QueryError(String),
    #[error("The order source returned data that could not be understood. {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceHealth {
    Healthy,
    Unhealthy(String),
}

/// Order statuses reported by the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceOrderStatus {
    PendingAvailability,
    Pending,
    Unshipped,
    PartiallyShipped,
    Shipped,
    InvoiceUnconfirmed,
    Canceled,
    Unfulfillable,
    Other(String),
}

impl SourceOrderStatus {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

impl FromStr for SourceOrderStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PendingAvailability" => Self::PendingAvailability,
            "Pending" => Self::Pending,
            "Unshipped" => Self::Unshipped,
            "PartiallyShipped" => Self::PartiallyShipped,
            "Shipped" => Self::Shipped,
            "InvoiceUnconfirmed" => Self::InvoiceUnconfirmed,
            "Canceled" => Self::Canceled,
            "Unfulfillable" => Self::Unfulfillable,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for SourceOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(s) => write!(f, "{s}"),
            s => write!(f, "{s:?}"),
        }
    }
}

/// The subset of an order that intake works with, plus the order document exactly as the source returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOrder {
    pub order_id: OrderId,
    pub purchase_date: DateTime<Utc>,
    pub status: SourceOrderStatus,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceOrderItem {
    pub asin: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceOrderItems {
    pub items: Vec<SourceOrderItem>,
    pub raw: Value,
}

/// The order source that intake polls.
///
/// Implementations are responsible for normalising whatever response shapes the upstream service uses into plain
/// sequences. An empty result is a valid answer.
#[allow(async_fn_in_trait)]
pub trait OrderSource {
    async fn health(&self) -> Result<SourceHealth, OrderSourceError>;

    async fn orders_updated_since(
        &self,
        cutoff: DateTime<Utc>,
        marketplace_ids: &[String],
    ) -> Result<Vec<SourceOrder>, OrderSourceError>;

    async fn order_items(&self, order_id: &OrderId) -> Result<SourceOrderItems, OrderSourceError>;
}
