use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
    Url,
};
use serde::de::DeserializeOwned;

use crate::{
    config::MwsConfig,
    data_objects::{ListOrderItemsResponse, ListOrdersResponse, ServiceStatusResponse},
    helpers::{canonical_query, sign_request},
    xml::xml_to_json,
    MwsApiError,
    MwsOrder,
    MwsOrderItems,
    ServiceStatus,
};

const ORDERS_PATH: &str = "/Orders/2013-09-01";
const ORDERS_VERSION: &str = "2013-09-01";

#[derive(Clone)]
pub struct MwsApi {
    config: MwsConfig,
    client: Arc<Client>,
}

impl MwsApi {
    pub fn new(config: MwsConfig) -> Result<Self, MwsApiError> {
        Url::parse(&config.endpoint_url()).map_err(|e| MwsApiError::Initialization(e.to_string()))?;
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/xml"));
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("mws_tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MwsApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MwsConfig {
        &self.config
    }

    /// Builds the signed form body for an Orders API action. `timestamp` is passed in so that signing is
    /// deterministic for a given instant.
    pub fn signed_body(
        &self,
        action: &str,
        params: &[(String, String)],
        timestamp: DateTime<Utc>,
    ) -> Result<String, MwsApiError> {
        let mut all_params = BTreeMap::new();
        all_params.insert("AWSAccessKeyId".to_string(), self.config.access_key.clone());
        all_params.insert("Action".to_string(), action.to_string());
        all_params.insert("SellerId".to_string(), self.config.seller_id.clone());
        all_params.insert("SignatureMethod".to_string(), "HmacSHA256".to_string());
        all_params.insert("SignatureVersion".to_string(), "2".to_string());
        all_params.insert("Timestamp".to_string(), timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
        all_params.insert("Version".to_string(), ORDERS_VERSION.to_string());
        for (k, v) in params {
            all_params.insert(k.clone(), v.clone());
        }
        let query = canonical_query(&all_params);
        let host = self.host()?;
        let signature = sign_request("POST", &host, ORDERS_PATH, &query, self.config.secret_key.reveal())?;
        Ok(format!("{query}&Signature={}", urlencoding::encode(&signature)))
    }

    async fn orders_action<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(String, String)],
    ) -> Result<T, MwsApiError> {
        let url = self.url();
        let body = self.signed_body(action, params, Utc::now())?;
        trace!("Sending {action} request to {url}");
        let response =
            self.client.post(url).body(body).send().await.map_err(|e| MwsApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("{action} request successful. {}", response.status());
            let body = response.text().await.map_err(|e| MwsApiError::RestResponseError(e.to_string()))?;
            let doc = xml_to_json(&body)?;
            serde_json::from_value::<T>(doc).map_err(|e| MwsApiError::JsonError(format!("{action} response. {e}")))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MwsApiError::RestResponseError(e.to_string()))?;
            Err(MwsApiError::QueryError { status, message })
        }
    }

    pub fn url(&self) -> String {
        format!("{}{ORDERS_PATH}", self.config.endpoint_url())
    }

    fn host(&self) -> Result<String, MwsApiError> {
        let url = Url::parse(&self.config.endpoint_url()).map_err(|e| MwsApiError::ConfigurationError(e.to_string()))?;
        let host = url.host_str().ok_or_else(|| MwsApiError::ConfigurationError(format!("No host in {url}")))?;
        Ok(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    pub async fn service_status(&self) -> Result<ServiceStatus, MwsApiError> {
        let response = self.orders_action::<ServiceStatusResponse>("GetServiceStatus", &[]).await?;
        debug!("Orders API service status: {:?}", response.result.status);
        Ok(response.result.status)
    }

    /// Fetches every order last updated at or after `updated_after` in the given marketplaces, following
    /// `NextToken` until the last page.
    pub async fn list_orders(
        &self,
        updated_after: DateTime<Utc>,
        marketplace_ids: &[String],
    ) -> Result<Vec<MwsOrder>, MwsApiError> {
        let mut params = marketplace_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (format!("MarketplaceId.Id.{}", i + 1), id.clone()))
            .collect::<Vec<_>>();
        params.push(("LastUpdatedAfter".to_string(), updated_after.to_rfc3339_opts(SecondsFormat::Secs, true)));
        debug!("Listing orders updated since {updated_after} in {} marketplaces", marketplace_ids.len());
        let page = self.orders_action::<ListOrdersResponse>("ListOrders", &params).await?;
        let (mut orders, mut next_token) = page.result.into_parts()?;
        while let Some(token) = next_token {
            trace!("Fetching next page of orders");
            let params = [("NextToken".to_string(), token)];
            let page = self.orders_action::<ListOrdersResponse>("ListOrdersByNextToken", &params).await?;
            let (more, token) = page.result.into_parts()?;
            orders.extend(more);
            next_token = token;
        }
        info!("Fetched {} orders updated since {updated_after}", orders.len());
        Ok(orders)
    }

    pub async fn list_order_items(&self, amazon_order_id: &str) -> Result<MwsOrderItems, MwsApiError> {
        debug!("Fetching items for order #{amazon_order_id}");
        let params = [("AmazonOrderId".to_string(), amazon_order_id.to_string())];
        let page = self.orders_action::<ListOrderItemsResponse>("ListOrderItems", &params).await?;
        let (mut items, mut next_token) = page.result.into_parts()?;
        while let Some(token) = next_token {
            let params = [("NextToken".to_string(), token)];
            let page = self.orders_action::<ListOrderItemsResponse>("ListOrderItemsByNextToken", &params).await?;
            let (more, token) = page.result.into_parts()?;
            items.extend(more);
            next_token = token;
        }
        debug!("Fetched {} items for order #{amazon_order_id}", items.len());
        Ok(MwsOrderItems { amazon_order_id: amazon_order_id.to_string(), items })
    }
}
