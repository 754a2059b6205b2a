use actix_web::{HttpRequest, Responder, web};
use chrono::Utc;
use common::{
    error::{AppError, Res},
    http::Success,
};
use serde_json::json;

use crate::{
    gateway::{MISSING_SIGNATURE, PaymentGateway},
    services::{self, webhook::Outcome},
    store::BillingStore,
};

/// Receives payment gateway events.
///
/// The raw body is authenticated against the `Stripe-Signature` header
/// before anything is parsed. Verified events are always acknowledged with
/// `200 { "received": true }`; store problems are logged instead of being
/// surfaced, so the gateway does not redeliver them.
///
/// # Errors
/// - `400` missing header or secret, bad signature, unreadable envelope
///
/// Handled types: `checkout.session.completed`, `invoice.payment_succeeded`,
/// `customer.subscription.deleted`.
pub async fn post_webhook(
    payload: web::Bytes,
    req: HttpRequest,
    store: web::Data<dyn BillingStore>,
    gateway: web::Data<dyn PaymentGateway>,
) -> Res<impl Responder> {
    let signature = req
        .headers()
        .get("stripe-signature")
        .and_then(|signature| signature.to_str().ok())
        .ok_or_else(|| AppError::BadRequest(MISSING_SIGNATURE.to_string()))?;

    let event = gateway.construct_event(&payload, signature)?;

    let outcome =
        services::webhook::handle_event(store.get_ref(), &event, Utc::now().date_naive()).await;
    if let Outcome::PartialUpdateFailure { failed } = &outcome {
        log::error!("Webhook {} left stored state partially updated: {:?}", event.id, failed);
    }

    Success::ok(json!({ "received": true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gateway::StripeGateway, mount_webhook, signature::sign, store::MockBillingStore};
    use actix_web::{App, http::header, test};
    use std::sync::Arc;
    use uuid::Uuid;

    const SECRET: &str = "whsec_route_test";

    macro_rules! app {
        ($store:expr, $secret:expr) => {{
            let store: Arc<dyn BillingStore> = Arc::new($store);
            let gateway: Arc<dyn PaymentGateway> =
                Arc::new(StripeGateway::new("sk_test_unused", $secret));
            test::init_service(
                App::new()
                    .app_data(web::Data::from(store))
                    .app_data(web::Data::from(gateway))
                    .service(web::scope("/api").service(mount_webhook())),
            )
            .await
        }};
    }

    fn completed_payload(restaurant_id: Uuid) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {
                "metadata": {"restaurantId": restaurant_id.to_string(), "planId": "monthly_50"},
                "customer": "cus_1",
                "subscription": "sub_1",
                "amount_total": 4900
            }}
        }))
        .unwrap()
    }

    fn signed_request(payload: Vec<u8>, header_value: String) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/stripe-webhook")
            .insert_header(("Stripe-Signature", header_value))
            .set_payload(payload)
    }

    #[actix_web::test]
    async fn bad_signature_is_400_without_writes() {
        let app = app!(MockBillingStore::new(), Some(SECRET.to_string()));

        let payload = completed_payload(Uuid::new_v4());
        let forged = sign(&payload, "whsec_forged", Utc::now().timestamp());
        let res = test::call_service(&app, signed_request(payload, forged).to_request()).await;

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Webhook signature verification failed");
    }

    #[actix_web::test]
    async fn missing_header_is_400() {
        let app = app!(MockBillingStore::new(), Some(SECRET.to_string()));

        let req = test::TestRequest::post()
            .uri("/api/stripe-webhook")
            .set_payload(completed_payload(Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Missing signature or webhook secret");
    }

    #[actix_web::test]
    async fn unconfigured_secret_is_400() {
        let app = app!(MockBillingStore::new(), None);

        let payload = completed_payload(Uuid::new_v4());
        let header_value = sign(&payload, SECRET, Utc::now().timestamp());
        let res = test::call_service(&app, signed_request(payload, header_value).to_request()).await;

        assert_eq!(res.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn verified_event_is_applied_and_acknowledged() {
        let restaurant_id = Uuid::new_v4();
        let mut store = MockBillingStore::new();
        store
            .expect_activate_restaurant_plan()
            .withf(move |activation| activation.restaurant_id == restaurant_id)
            .times(1)
            .returning(|_| Ok(1));
        store.expect_insert_subscription().times(1).returning(|_| Ok(true));
        let app = app!(store, Some(SECRET.to_string()));

        let payload = completed_payload(restaurant_id);
        let header_value = sign(&payload, SECRET, Utc::now().timestamp());
        let res = test::call_service(&app, signed_request(payload, header_value).to_request()).await;

        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"received": true}));
    }

    #[actix_web::test]
    async fn malformed_event_is_acknowledged() {
        let app = app!(MockBillingStore::new(), Some(SECRET.to_string()));

        let payload = serde_json::to_vec(&json!({
            "id": "evt_2",
            "type": "checkout.session.completed",
            "data": {"object": {"metadata": {}, "customer": "cus_1"}}
        }))
        .unwrap();
        let header_value = sign(&payload, SECRET, Utc::now().timestamp());
        let res = test::call_service(&app, signed_request(payload, header_value).to_request()).await;

        assert_eq!(res.status().as_u16(), 200);
    }

    #[actix_web::test]
    async fn other_methods_are_405() {
        let app = app!(MockBillingStore::new(), Some(SECRET.to_string()));

        let res = test::call_service(
            &app,
            test::TestRequest::put().uri("/api/stripe-webhook").to_request(),
        )
        .await;

        assert_eq!(res.status().as_u16(), 405);
        assert_eq!(res.headers().get(header::ALLOW).unwrap(), "POST");
    }
}
