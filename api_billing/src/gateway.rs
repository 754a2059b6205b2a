use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use common::error::{AppError, Res};
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionLineItemsPriceDataRecurring,
    CreateCheckoutSessionLineItemsPriceDataRecurringInterval,
    CreateCheckoutSessionPaymentMethodTypes, Currency,
};

use crate::{
    dtos::event::WebhookEvent,
    signature::{self, DEFAULT_TOLERANCE},
};

pub const MISSING_SIGNATURE: &str = "Missing signature or webhook secret";
pub const SIGNATURE_FAILED: &str = "Webhook signature verification failed";

/// A hosted checkout for one monthly USD subscription line item, paid by
/// card.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionParams {
    pub customer_email: String,
    pub client_reference_id: String,
    pub product_name: String,
    pub product_description: String,
    /// Minor units.
    pub unit_amount: i64,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

/// The payment gateway as seen by the billing endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout session and returns its id.
    async fn create_checkout_session(&self, params: CheckoutSessionParams) -> Res<String>;

    /// Authenticates a webhook delivery against its signature header and
    /// decodes the event envelope.
    fn construct_event(&self, payload: &[u8], signature: &str) -> Res<WebhookEvent>;
}

pub struct StripeGateway {
    client: Client,
    webhook_secret: Option<String>,
}

impl StripeGateway {
    pub fn new(secret_key: &str, webhook_secret: Option<String>) -> Self {
        StripeGateway {
            client: Client::new(secret_key),
            webhook_secret,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(&self, params: CheckoutSessionParams) -> Res<String> {
        let request = CreateCheckoutSession {
            payment_method_types: Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]),
            customer_email: Some(params.customer_email.as_str()),
            client_reference_id: Some(params.client_reference_id.as_str()),
            line_items: Some(vec![CreateCheckoutSessionLineItems {
                price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                    currency: Currency::USD,
                    product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                        name: params.product_name.clone(),
                        description: Some(params.product_description.clone()),
                        ..Default::default()
                    }),
                    recurring: Some(CreateCheckoutSessionLineItemsPriceDataRecurring {
                        interval: CreateCheckoutSessionLineItemsPriceDataRecurringInterval::Month,
                        interval_count: None,
                    }),
                    unit_amount: Some(params.unit_amount),
                    ..Default::default()
                }),
                quantity: Some(1),
                ..Default::default()
            }]),
            mode: Some(CheckoutSessionMode::Subscription),
            success_url: Some(params.success_url.as_str()),
            cancel_url: Some(params.cancel_url.as_str()),
            metadata: Some(params.metadata.clone()),
            ..Default::default()
        };

        let session = CheckoutSession::create(&self.client, request).await?;
        Ok(session.id.to_string())
    }

    fn construct_event(&self, payload: &[u8], signature: &str) -> Res<WebhookEvent> {
        let secret = self
            .webhook_secret
            .as_deref()
            .ok_or_else(|| AppError::BadRequest(MISSING_SIGNATURE.to_string()))?;

        signature::verify_signature(
            payload,
            signature,
            secret,
            Utc::now().timestamp(),
            DEFAULT_TOLERANCE,
        )
        .map_err(|e| {
            log::warn!("{}: {}", SIGNATURE_FAILED, e);
            AppError::SignatureInvalid(SIGNATURE_FAILED.to_string())
        })?;

        serde_json::from_slice::<WebhookEvent>(payload).map_err(|e| {
            log::warn!("Unreadable webhook envelope: {}", e);
            AppError::BadRequest("Invalid webhook payload".to_string())
        })
    }
}
