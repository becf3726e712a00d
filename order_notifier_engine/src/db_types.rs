use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Type;
use thiserror::Error;

//--------------------------------------      OrderId       ---------------------------------------------------------
/// The marketplace's identifier for an order. It is the primary key of the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

//--------------------------------------     Order records     ------------------------------------------------------
/// An order record as it is written by intake. Once stored, none of these fields change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderRecord {
    pub order_id: OrderId,
    pub purchase_date: DateTime<Utc>,
    /// ASIN of the first line item
    pub product_asin: String,
    /// Quantity of the first line item
    pub order_qty: i64,
    pub order_raw: Value,
    pub order_items_raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub purchase_date: DateTime<Utc>,
    pub product_asin: String,
    pub order_qty: i64,
    pub order_raw: Value,
    pub order_items_raw: Value,
    /// Set once the notification for this order was delivered
    pub notified: bool,
    /// Set if the notification for this order could not be delivered
    pub failed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn notification_status(&self) -> NotificationStatus {
        match (self.notified, self.failed) {
            (true, _) => NotificationStatus::Notified,
            (false, true) => NotificationStatus::Failed,
            (false, false) => NotificationStatus::Pending,
        }
    }

    /// True once dispatch has reached a terminal state for this order.
    pub fn is_handled(&self) -> bool {
        self.notified || self.failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    Pending,
    Notified,
    Failed,
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Notified => write!(f, "Notified"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

//--------------------------------------     Change feed     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "MODIFY")]
    Modify,
    #[serde(rename = "REMOVE")]
    Remove,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid change type: {0}")]
pub struct ChangeTypeConversionError(String);

impl FromStr for ChangeType {
    type Err = ChangeTypeConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(Self::Insert),
            "MODIFY" => Ok(Self::Modify),
            "REMOVE" => Ok(Self::Remove),
            _ => Err(ChangeTypeConversionError(s.to_string())),
        }
    }
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Modify => write!(f, "MODIFY"),
            Self::Remove => write!(f, "REMOVE"),
        }
    }
}

/// A single entry in the record store's change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Position in the feed. Strictly increasing; per-key ordering follows from it.
    pub sequence: i64,
    pub event_type: ChangeType,
    pub order_id: OrderId,
    /// The full record after the mutation. Absent for removals.
    pub new_image: Option<OrderRecord>,
    pub created_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn is_insert(&self) -> bool {
        self.event_type == ChangeType::Insert
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn record(notified: bool, failed: bool) -> OrderRecord {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        OrderRecord {
            order_id: "A1".into(),
            purchase_date: ts,
            product_asin: "B2".into(),
            order_qty: 3,
            order_raw: json!({}),
            order_items_raw: json!([]),
            notified,
            failed,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn notification_status() {
        assert_eq!(record(false, false).notification_status(), NotificationStatus::Pending);
        assert_eq!(record(true, false).notification_status(), NotificationStatus::Notified);
        assert_eq!(record(false, true).notification_status(), NotificationStatus::Failed);
        assert!(!record(false, false).is_handled());
        assert!(record(false, true).is_handled());
    }

    #[test]
    fn change_types() {
        for t in [ChangeType::Insert, ChangeType::Modify, ChangeType::Remove] {
            assert_eq!(t.to_string().parse::<ChangeType>().unwrap(), t);
        }
        assert!("UPSERT".parse::<ChangeType>().is_err());
    }

    #[test]
    fn image_from_json() {
        let image = json!({
            "order_id": "A1",
            "purchase_date": "2024-05-01T08:00:00Z",
            "product_asin": "B2",
            "order_qty": 3,
            "order_raw": {"AmazonOrderId": "A1"},
            "order_items_raw": [{"ASIN": "B2"}],
            "notified": false,
            "failed": false,
            "created_at": "2024-05-01T08:00:00Z",
            "updated_at": "2024-05-01T08:00:00Z"
        });
        let record: OrderRecord = serde_json::from_value(image).unwrap();
        assert_eq!(record.order_id, OrderId::new("A1"));
        assert_eq!(record.order_qty, 3);
        assert_eq!(record.order_raw["AmazonOrderId"], "A1");
    }
}
