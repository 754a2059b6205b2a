mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_billing::{
    gateway::{PaymentGateway, StripeGateway},
    store::{BillingStore, PgStore},
};
use api_dashboard::ledger::{Ledger, PgLedger};
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env().expect("Failed to load configuration");
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    if config.stripe_webhook_secret.is_none() {
        log::warn!("STRIPE_WEBHOOK_SECRET is not set, webhook deliveries will be rejected");
    }

    // capabilities shared by all workers
    let store: Arc<dyn BillingStore> = Arc::new(PgStore::new(pool.clone()));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(
        &config.stripe_secret_key,
        config.stripe_webhook_secret.clone(),
    ));
    let ledger: Arc<dyn Ledger> = Arc::new(PgLedger::new(pool.clone()));

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::from(gateway.clone()))
            .app_data(web::Data::from(ledger.clone()))
            .wrap(logger::middleware(config_data.console_logging_enabled))
            .service(
                web::scope("/api")
                    .service(api_billing::mount_checkout())
                    .service(api_billing::mount_webhook())
                    .service(
                        api_dashboard::mount_dashboard()
                            .wrap(api_auth::auth_middleware(&config_data.jwt_config))
                            .wrap(cors::middleware(&origin)),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
