use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use mws_tools::MwsApi;
use order_notifier_engine::SqliteDatabase;

use crate::{
    config::NotifierConfig,
    errors::ServerError,
    feed_worker::start_feed_worker,
    intake_worker::start_intake_worker,
    integrations::{mws::MwsOrderSource, slack::SlackWebhook},
    routes::{health, FailedOrdersRoute, OrderByIdRoute},
};

/// Prepares the database, starts the intake and change feed workers, and then serves the status routes until the
/// server is stopped.
pub async fn run_server(config: NotifierConfig) -> Result<(), ServerError> {
    let sink = SlackWebhook::new(config.webhook_url.clone())?;
    SqliteDatabase::create_if_missing(&config.database_url).await?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25).await?;
    db.run_migrations().await?;
    info!("🗃️ Database is ready at {}", config.database_url);

    let api = MwsApi::new(config.mws.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let source = MwsOrderSource::new(api);
    let _intake = start_intake_worker(source, db.clone(), config.intake, config.mws.marketplace_ids.clone());
    let _feed = start_feed_worker(db.clone(), sink, config.feed);

    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: NotifierConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("mon::access_log"))
            .app_data(web::Data::new(db.clone()))
            .service(health)
            .service(FailedOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
