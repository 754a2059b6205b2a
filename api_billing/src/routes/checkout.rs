use std::sync::Arc;

use actix_web::{Responder, web};
use common::{env_config::Config, error::Res, http::Success};

use crate::{
    dtos::checkout::{CheckoutRequest, CheckoutResponse},
    gateway::PaymentGateway,
    services,
    store::BillingStore,
};

/// Starts a hosted checkout for a restaurant's plan upgrade.
///
/// # Input
/// - JSON body `{ "restaurantId": "<uuid>", "planId": "monthly_50" }`
///
/// # Output
/// - `200 { "sessionId": "cs_..." }`; the browser redirects to the hosted page
/// - `404` unknown restaurant, `400` invalid plan, `500` gateway failure
pub async fn post_checkout(
    req: web::Json<CheckoutRequest>,
    config: web::Data<Arc<Config>>,
    store: web::Data<dyn BillingStore>,
    gateway: web::Data<dyn PaymentGateway>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let session_id = services::checkout::create_checkout_session(
        store.get_ref(),
        gateway.get_ref(),
        &config.app_url,
        req.restaurant_id.as_deref(),
        req.plan_id.as_deref(),
    )
    .await?;

    Success::ok(CheckoutResponse { session_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gateway::MockPaymentGateway, mount_checkout, store::MockBillingStore};
    use actix_web::{App, http::header, test};
    use common::env_config::JwtConfig;
    use uuid::Uuid;

    fn config() -> Arc<Config> {
        Arc::new(Config {
            environment: "development".to_string(),
            database_url: "postgres://localhost/unused".to_string(),
            jwt_config: JwtConfig {
                secret: "unused".to_string(),
                audience: "authenticated".to_string(),
            },
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            num_workers: 1,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            console_logging_enabled: false,
            app_url: "https://console.example.test".to_string(),
            stripe_secret_key: String::new(),
            stripe_webhook_secret: None,
        })
    }

    macro_rules! app {
        ($store:expr, $gateway:expr) => {{
            let store: Arc<dyn BillingStore> = Arc::new($store);
            let gateway: Arc<dyn PaymentGateway> = Arc::new($gateway);
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config()))
                    .app_data(web::Data::from(store))
                    .app_data(web::Data::from(gateway))
                    .service(web::scope("/api").service(mount_checkout())),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn unknown_restaurant_is_404() {
        let mut store = MockBillingStore::new();
        store.expect_find_restaurant().returning(|_| Ok(None));
        let app = app!(store, MockPaymentGateway::new());

        let req = test::TestRequest::post()
            .uri("/api/stripe-checkout")
            .set_json(serde_json::json!({
                "restaurantId": Uuid::new_v4().to_string(),
                "planId": "monthly_50"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), 404);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Restaurant not found");
    }

    #[actix_web::test]
    async fn unreadable_body_is_a_json_400() {
        let app = app!(MockBillingStore::new(), MockPaymentGateway::new());

        let req = test::TestRequest::post()
            .uri("/api/stripe-checkout")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"restaurantId\": ")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
    }

    #[actix_web::test]
    async fn other_methods_are_405() {
        let app = app!(MockBillingStore::new(), MockPaymentGateway::new());

        let req = test::TestRequest::get().uri("/api/stripe-checkout").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), 405);
        assert_eq!(res.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[actix_web::test]
    async fn preflight_allows_any_origin() {
        let app = app!(MockBillingStore::new(), MockPaymentGateway::new());

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/stripe-checkout")
            .insert_header((header::ORIGIN, "https://menu.somewhere.test"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
