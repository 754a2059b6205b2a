use actix_cors::Cors;
use actix_web::{dev::HttpServiceFactory, web};

pub mod gateway;
pub mod signature;
pub mod store;

pub mod routes {
    pub mod checkout;
    pub mod webhook;
}

pub mod services {
    pub mod checkout;
    pub mod webhook;
}

pub mod dtos {
    pub mod checkout;
    pub mod event;
}

/// `POST /stripe-checkout`, callable from any origin.
pub fn mount_checkout() -> impl HttpServiceFactory {
    web::resource("/stripe-checkout")
        .app_data(common::http::json_config())
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["POST"])
                .allowed_header(actix_web::http::header::CONTENT_TYPE)
                .send_wildcard()
                .max_age(3600),
        )
        .route(web::post().to(routes::checkout::post_checkout))
        .default_service(web::to(common::http::post_only))
}

/// `POST /stripe-webhook`, called by the payment gateway.
pub fn mount_webhook() -> impl HttpServiceFactory {
    web::resource("/stripe-webhook")
        .route(web::post().to(routes::webhook::post_webhook))
        .default_service(web::to(common::http::post_only))
}
