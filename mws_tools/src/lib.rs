//! A small client for the marketplace web service (MWS) Orders API.
//!
//! Only the calls needed for order intake are supported: the service status check, order listing by last-update
//! time (with `NextToken` paging) and order item lookup. The XML response documents are converted to JSON trees and
//! projected onto typed structs at the boundary. Every projection keeps the raw JSON it was built from.
mod api;
mod config;
mod data_objects;
mod error;
mod xml;

pub mod helpers;

pub use api::MwsApi;
pub use config::{MwsConfig, MwsRegion};
pub use data_objects::{MwsOrder, MwsOrderItem, MwsOrderItems, ServiceStatus};
pub use error::MwsApiError;
pub use helpers::OneOrMany;
pub use xml::xml_to_json;
