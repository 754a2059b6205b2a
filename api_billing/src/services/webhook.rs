use chrono::{Duration, NaiveDate};
use common::{
    error::{AppError, Res},
    plan::BILLING_PERIOD_DAYS,
};
use db::dtos::{restaurant::PlanActivation, subscription::SubscriptionCreateRequest};
use sqlx::types::BigDecimal;

use crate::{
    dtos::event::{BillingEvent, CheckoutCompleted, InvoicePaid, SubscriptionDeleted, WebhookEvent},
    store::BillingStore,
};

/// What processing an event did to the stored records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every write of the event succeeded.
    Applied,
    /// The event type is not one we act on.
    Unhandled,
    /// The payload did not match the schema of its type; nothing was written.
    Malformed(String),
    /// At least one write failed. Writes are independent, so the others
    /// may have landed.
    PartialUpdateFailure { failed: Vec<&'static str> },
}

type Step = (&'static str, Res<u64>);

/// Applies a verified event to the store. Store failures never escape: they
/// are logged and reported through the returned [`Outcome`], so the gateway
/// always gets an acknowledgement.
pub async fn handle_event(
    store: &dyn BillingStore,
    event: &WebhookEvent,
    today: NaiveDate,
) -> Outcome {
    log::info!("Processing webhook event {} ({})", event.id, event.event_type);

    let billing_event = match BillingEvent::try_from(event) {
        Ok(billing_event) => billing_event,
        Err(e) => {
            log::warn!("Ignoring webhook event: {}", e);
            return Outcome::Malformed(e.to_string());
        }
    };

    let steps = match billing_event {
        BillingEvent::CheckoutCompleted(checkout) => {
            checkout_completed(store, checkout, today).await
        }
        BillingEvent::InvoicePaid(invoice) => invoice_paid(store, invoice).await,
        BillingEvent::SubscriptionDeleted(subscription) => {
            subscription_deleted(store, subscription, today).await
        }
        BillingEvent::Unhandled(event_type) => {
            log::info!("Unhandled event type {}", event_type);
            return Outcome::Unhandled;
        }
    };

    let mut failed = Vec::new();
    for (step, result) in steps {
        match result {
            Ok(0) => log::warn!("Event {}: {} matched no record", event.id, step),
            Ok(_) => {}
            Err(e) => {
                log::error!("Event {}: {} failed: {}", event.id, step, e);
                failed.push(step);
            }
        }
    }

    if failed.is_empty() {
        return Outcome::Applied;
    }

    let error = AppError::PartialUpdate(format!("event {}: {}", event.id, failed.join(", ")));
    log::error!("{}", error);
    Outcome::PartialUpdateFailure { failed }
}

async fn checkout_completed(
    store: &dyn BillingStore,
    checkout: CheckoutCompleted,
    today: NaiveDate,
) -> Vec<Step> {
    let activation = PlanActivation {
        restaurant_id: checkout.restaurant_id,
        subscription_plan: checkout.plan.as_str().to_string(),
        stripe_customer_id: checkout.customer,
        order_limit: checkout.plan.order_limit(),
    };
    let restaurant = store.activate_restaurant_plan(activation).await;

    let subscription = SubscriptionCreateRequest {
        restaurant_id: checkout.restaurant_id,
        plan_type: checkout.plan.as_str().to_string(),
        stripe_subscription_id: checkout.subscription,
        start_date: today,
        current_period_start: today,
        current_period_end: today + Duration::days(BILLING_PERIOD_DAYS),
        amount: BigDecimal::new(checkout.amount_total.into(), 2),
    };
    let stripe_subscription_id = subscription.stripe_subscription_id.clone();
    let inserted = store.insert_subscription(subscription).await.map(|created| {
        if !created {
            log::info!("Subscription {} already recorded", stripe_subscription_id);
        }
        1
    });

    vec![("restaurant activation", restaurant), ("subscription insert", inserted)]
}

async fn invoice_paid(store: &dyn BillingStore, invoice: InvoicePaid) -> Vec<Step> {
    let period = store
        .update_subscription_period(&invoice.subscription, invoice.period_start, invoice.period_end)
        .await;

    vec![("subscription period update", period)]
}

async fn subscription_deleted(
    store: &dyn BillingStore,
    subscription: SubscriptionDeleted,
    today: NaiveDate,
) -> Vec<Step> {
    let restaurant = store
        .deactivate_restaurant_by_customer(&subscription.customer)
        .await;
    let cancelled = store.cancel_subscription(&subscription.id, today).await;

    vec![("restaurant deactivation", restaurant), ("subscription cancellation", cancelled)]
}
