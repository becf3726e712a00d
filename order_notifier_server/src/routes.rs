//! Request handler definitions
//!
//! Define each route and its handler here. The routes are read-only views onto the record store; nothing here
//! changes a record.
//!
//! Any long, non-cpu-bound operation (e.g. database access) must be expressed as futures or asynchronous
//! functions so that actix worker threads are never blocked.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_notifier_engine::{db_types::OrderId, RecordStore};

use crate::{
    data_objects::{FailedOrders, OrderSummary},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(failed_orders => Get "/orders/failed" impl RecordStore);
/// Route handler for the failed orders endpoint
///
/// Returns every order whose notification failed and has not succeeded since, oldest first. Failed notifications
/// are never retried automatically; this list is the starting point for following them up by hand.
pub async fn failed_orders<B: RecordStore>(store: web::Data<B>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET failed orders");
    let orders = store.fetch_failed_orders().await.map_err(|e| {
        debug!("💻️ Could not fetch failed orders. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(FailedOrders::new(&orders)))
}

route!(order_by_id => Get "/order/{order_id}" impl RecordStore);
pub async fn order_by_id<B: RecordStore>(
    path: web::Path<String>,
    store: web::Data<B>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::new(path.into_inner());
    debug!("💻️ GET order {order_id}");
    let order = store.fetch_order(&order_id).await?;
    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderSummary::from(&order))),
        None => Err(ServerError::NoRecordFound(format!("Order {order_id}"))),
    }
}
