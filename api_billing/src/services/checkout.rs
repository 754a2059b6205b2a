use std::collections::HashMap;

use common::{
    error::{AppError, Res},
    plan::Plan,
};
use db::models::restaurant::Restaurant;
use uuid::Uuid;

use crate::{
    gateway::{CheckoutSessionParams, PaymentGateway},
    store::BillingStore,
};

/// Describes the hosted checkout for `restaurant` buying `plan`.
pub fn build_session_params(
    restaurant: &Restaurant,
    plan: Plan,
    app_url: &str,
) -> Res<CheckoutSessionParams> {
    let unit_amount = plan
        .monthly_price()
        .ok_or_else(|| AppError::InvalidArgument("Invalid plan selected".to_string()))?;
    let restaurant_id = restaurant.id.to_string();

    Ok(CheckoutSessionParams {
        customer_email: restaurant.email.clone(),
        client_reference_id: restaurant_id.clone(),
        product_name: format!("{} - {}", plan.display_name(), restaurant.name),
        product_description: format!("Telegram Bot Service for {}", restaurant.name),
        unit_amount,
        success_url: format!("{}/dashboard?session_id={{CHECKOUT_SESSION_ID}}", app_url),
        cancel_url: format!("{}/dashboard/billing", app_url),
        metadata: HashMap::from([
            ("restaurantId".to_string(), restaurant_id),
            ("planId".to_string(), plan.as_str().to_string()),
        ]),
    })
}

/// Validates the restaurant, then the plan, and only then asks the gateway
/// for a session. Returns the session id.
pub async fn create_checkout_session(
    store: &dyn BillingStore,
    gateway: &dyn PaymentGateway,
    app_url: &str,
    restaurant_id: Option<&str>,
    plan_id: Option<&str>,
) -> Res<String> {
    let not_found = || AppError::NotFound("Restaurant not found".to_string());

    let restaurant_id = restaurant_id
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(not_found)?;

    let restaurant = store
        .find_restaurant(restaurant_id)
        .await
        .map_err(|e| {
            log::error!("Failed to load restaurant {}: {}", restaurant_id, e);
            AppError::CheckoutCreationFailed
        })?
        .ok_or_else(not_found)?;

    let plan = plan_id
        .and_then(Plan::checkout)
        .ok_or_else(|| AppError::InvalidArgument("Invalid plan selected".to_string()))?;

    let params = build_session_params(&restaurant, plan, app_url)?;

    gateway.create_checkout_session(params).await.map_err(|e| {
        log::error!(
            "Error creating checkout session for restaurant {} ({}): {}",
            restaurant.id,
            plan,
            e
        );
        AppError::CheckoutCreationFailed
    })
}
