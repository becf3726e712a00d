use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    helpers::{empty_as_default, quantity_from_number_or_string, OneOrMany},
    MwsApiError,
};

//--------------------------------------   Service status   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "GREEN")]
    Green,
    /// Operating normally, with an informational message attached.
    #[serde(rename = "GREEN_I")]
    GreenInfo,
    #[serde(rename = "YELLOW")]
    Yellow,
    #[serde(rename = "RED")]
    Red,
}

impl ServiceStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Green | Self::GreenInfo)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceStatusResponse {
    #[serde(rename = "GetServiceStatusResult")]
    pub result: ServiceStatusResult,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceStatusResult {
    #[serde(rename = "Status")]
    pub status: ServiceStatus,
}

//--------------------------------------       Orders       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct MwsOrder {
    pub amazon_order_id: String,
    pub purchase_date: DateTime<Utc>,
    pub last_update_date: Option<DateTime<Utc>>,
    pub order_status: String,
    /// The order document exactly as it was received
    pub raw: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrderFields {
    amazon_order_id: String,
    purchase_date: DateTime<Utc>,
    #[serde(default)]
    last_update_date: Option<DateTime<Utc>>,
    order_status: String,
}

impl TryFrom<Value> for MwsOrder {
    type Error = MwsApiError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = OrderFields::deserialize(&raw)
            .map_err(|e| MwsApiError::JsonError(format!("Invalid order document. {e}")))?;
        Ok(Self {
            amazon_order_id: fields.amazon_order_id,
            purchase_date: fields.purchase_date,
            last_update_date: fields.last_update_date,
            order_status: fields.order_status,
            raw,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListOrdersResponse {
    #[serde(rename = "ListOrdersResult", alias = "ListOrdersByNextTokenResult")]
    pub result: ListOrdersResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ListOrdersResult {
    #[serde(rename = "Orders", default, deserialize_with = "empty_as_default")]
    pub orders: OrderList,
    #[serde(rename = "NextToken", default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OrderList {
    #[serde(rename = "Order", default)]
    pub order: OneOrMany<Value>,
}

impl ListOrdersResult {
    /// Splits the page into typed orders and the token for the next page, if there is one.
    pub fn into_parts(self) -> Result<(Vec<MwsOrder>, Option<String>), MwsApiError> {
        let orders = self.orders.order.into_vec().into_iter().map(MwsOrder::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok((orders, self.next_token.filter(|t| !t.is_empty())))
    }
}

//--------------------------------------     Order items    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct MwsOrderItem {
    pub asin: String,
    pub seller_sku: Option<String>,
    pub order_item_id: Option<String>,
    pub quantity_ordered: u32,
    pub raw: Value,
}

#[derive(Deserialize)]
struct OrderItemFields {
    #[serde(rename = "ASIN")]
    asin: String,
    #[serde(rename = "SellerSKU", default)]
    seller_sku: Option<String>,
    #[serde(rename = "OrderItemId", default)]
    order_item_id: Option<String>,
    #[serde(rename = "QuantityOrdered", deserialize_with = "quantity_from_number_or_string")]
    quantity_ordered: u32,
}

impl TryFrom<Value> for MwsOrderItem {
    type Error = MwsApiError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = OrderItemFields::deserialize(&raw)
            .map_err(|e| MwsApiError::JsonError(format!("Invalid order item document. {e}")))?;
        Ok(Self {
            asin: fields.asin,
            seller_sku: fields.seller_sku,
            order_item_id: fields.order_item_id,
            quantity_ordered: fields.quantity_ordered,
            raw,
        })
    }
}

/// All the line items for a single order, across every page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct MwsOrderItems {
    pub amazon_order_id: String,
    pub items: Vec<MwsOrderItem>,
}

impl MwsOrderItems {
    /// The raw item documents as a JSON array
    pub fn raw(&self) -> Value {
        Value::Array(self.items.iter().map(|i| i.raw.clone()).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListOrderItemsResponse {
    #[serde(rename = "ListOrderItemsResult", alias = "ListOrderItemsByNextTokenResult")]
    pub result: ListOrderItemsResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ListOrderItemsResult {
    #[serde(rename = "OrderItems", default, deserialize_with = "empty_as_default")]
    pub order_items: OrderItemList,
    #[serde(rename = "NextToken", default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OrderItemList {
    #[serde(rename = "OrderItem", default)]
    pub order_item: OneOrMany<Value>,
}

impl ListOrderItemsResult {
    pub fn into_parts(self) -> Result<(Vec<MwsOrderItem>, Option<String>), MwsApiError> {
        let items = self
            .order_items
            .order_item
            .into_vec()
            .into_iter()
            .map(MwsOrderItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, self.next_token.filter(|t| !t.is_empty())))
    }
}
