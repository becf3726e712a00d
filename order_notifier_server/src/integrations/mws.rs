use chrono::{DateTime, Utc};
use log::*;
use mws_tools::{MwsApi, MwsApiError, MwsOrder, MwsOrderItems};
use order_notifier_engine::{
    db_types::OrderId,
    traits::{SourceHealth, SourceOrder, SourceOrderItem, SourceOrderItems, SourceOrderStatus},
    OrderSource,
    OrderSourceError,
};

/// Serves orders from the marketplace Orders API.
#[derive(Clone)]
pub struct MwsOrderSource {
    api: MwsApi,
}

impl MwsOrderSource {
    pub fn new(api: MwsApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &MwsApi {
        &self.api
    }
}

impl OrderSource for MwsOrderSource {
    async fn health(&self) -> Result<SourceHealth, OrderSourceError> {
        let status = self.api.service_status().await.map_err(source_error)?;
        if status.is_operational() {
            Ok(SourceHealth::Healthy)
        } else {
            warn!("📥️ Orders API reports its status as {status:?}");
            Ok(SourceHealth::Unhealthy(format!("Orders API status is {status:?}")))
        }
    }

    async fn orders_updated_since(
        &self,
        cutoff: DateTime<Utc>,
        marketplace_ids: &[String],
    ) -> Result<Vec<SourceOrder>, OrderSourceError> {
        let orders = self.api.list_orders(cutoff, marketplace_ids).await.map_err(source_error)?;
        Ok(orders.into_iter().map(source_order_from_mws).collect())
    }

    async fn order_items(&self, order_id: &OrderId) -> Result<SourceOrderItems, OrderSourceError> {
        let items = self.api.list_order_items(order_id.as_str()).await.map_err(source_error)?;
        Ok(source_items_from_mws(items))
    }
}

pub fn source_order_from_mws(order: MwsOrder) -> SourceOrder {
    let status = order.order_status.parse::<SourceOrderStatus>().unwrap_or_else(|e| match e {});
    SourceOrder {
        order_id: OrderId::new(order.amazon_order_id),
        purchase_date: order.purchase_date,
        status,
        raw: order.raw,
    }
}

pub fn source_items_from_mws(items: MwsOrderItems) -> SourceOrderItems {
    let raw = items.raw();
    let items = items
        .items
        .into_iter()
        .map(|item| SourceOrderItem { asin: item.asin, quantity: item.quantity_ordered })
        .collect();
    SourceOrderItems { items, raw }
}

/// Throttling and server-side failures are reported as the source being unavailable; anything else means the
/// request or the response was wrong.
fn source_error(e: MwsApiError) -> OrderSourceError {
    match e {
        MwsApiError::RestResponseError(s) => OrderSourceError::Unavailable(s),
        MwsApiError::QueryError { status, message } if status >= 500 => {
            OrderSourceError::Unavailable(format!("HTTP {status}. {message}"))
        },
        MwsApiError::QueryError { status, message } => {
            OrderSourceError::QueryError(format!("HTTP {status}. {message}"))
        },
        MwsApiError::JsonError(s) | MwsApiError::XmlError(s) => OrderSourceError::InvalidData(s),
        e => OrderSourceError::QueryError(e.to_string()),
    }
}
