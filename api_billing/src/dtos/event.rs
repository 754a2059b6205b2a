//! Webhook payloads. The envelope is generic; each handled event type has
//! its own schema for `data.object`.

use chrono::{DateTime, NaiveDate};
use common::{
    error::{AppError, Res},
    plan::Plan,
};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const INVOICE_PAYMENT_SUCCEEDED: &str = "invoice.payment_succeeded";
pub const CUSTOMER_SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutMetadata {
    restaurant_id: Uuid,
    plan_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCheckoutCompleted {
    metadata: CheckoutMetadata,
    customer: String,
    subscription: String,
    amount_total: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawInvoicePaid {
    subscription: String,
    period_start: i64,
    period_end: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscriptionDeleted {
    pub id: String,
    pub customer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutCompleted {
    pub restaurant_id: Uuid,
    pub plan: Plan,
    pub customer: String,
    pub subscription: String,
    /// Minor units.
    pub amount_total: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoicePaid {
    pub subscription: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// A verified event, validated against the schema of its type.
#[derive(Debug, Clone, PartialEq)]
pub enum BillingEvent {
    CheckoutCompleted(CheckoutCompleted),
    InvoicePaid(InvoicePaid),
    SubscriptionDeleted(SubscriptionDeleted),
    Unhandled(String),
}

impl TryFrom<&WebhookEvent> for BillingEvent {
    type Error = AppError;

    fn try_from(event: &WebhookEvent) -> Res<Self> {
        match event.event_type.as_str() {
            CHECKOUT_SESSION_COMPLETED => {
                let raw: RawCheckoutCompleted = object(event)?;
                let plan = Plan::checkout(&raw.metadata.plan_id).ok_or_else(|| {
                    AppError::MalformedEvent(format!(
                        "{}: unknown plan {:?}",
                        event.id, raw.metadata.plan_id
                    ))
                })?;
                Ok(BillingEvent::CheckoutCompleted(CheckoutCompleted {
                    restaurant_id: raw.metadata.restaurant_id,
                    plan,
                    customer: raw.customer,
                    subscription: raw.subscription,
                    amount_total: raw.amount_total,
                }))
            }
            INVOICE_PAYMENT_SUCCEEDED => {
                let raw: RawInvoicePaid = object(event)?;
                Ok(BillingEvent::InvoicePaid(InvoicePaid {
                    subscription: raw.subscription,
                    period_start: date(event, raw.period_start)?,
                    period_end: date(event, raw.period_end)?,
                }))
            }
            CUSTOMER_SUBSCRIPTION_DELETED => Ok(BillingEvent::SubscriptionDeleted(object(event)?)),
            other => Ok(BillingEvent::Unhandled(other.to_string())),
        }
    }
}

fn object<T: DeserializeOwned>(event: &WebhookEvent) -> Res<T> {
    T::deserialize(&event.data.object)
        .map_err(|e| AppError::MalformedEvent(format!("{} ({}): {}", event.id, event.event_type, e)))
}

/// Unix seconds to the UTC calendar date.
fn date(event: &WebhookEvent, seconds: i64) -> Res<NaiveDate> {
    DateTime::from_timestamp(seconds, 0)
        .map(|datetime| datetime.date_naive())
        .ok_or_else(|| AppError::MalformedEvent(format!("{}: timestamp {} out of range", event.id, seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(event_type: &str, object: serde_json::Value) -> WebhookEvent {
        WebhookEvent {
            id: "evt_test".to_string(),
            event_type: event_type.to_string(),
            data: EventData { object },
        }
    }

    #[test]
    fn parses_completed_checkout() {
        let restaurant_id = Uuid::new_v4();
        let parsed = BillingEvent::try_from(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({
                "id": "cs_test_1",
                "metadata": {"restaurantId": restaurant_id.to_string(), "planId": "monthly_50"},
                "customer": "cus_1",
                "subscription": "sub_1",
                "amount_total": 4900
            }),
        ))
        .unwrap();

        assert_eq!(
            parsed,
            BillingEvent::CheckoutCompleted(CheckoutCompleted {
                restaurant_id,
                plan: Plan::Monthly50,
                customer: "cus_1".to_string(),
                subscription: "sub_1".to_string(),
                amount_total: 4900,
            })
        );
    }

    #[test]
    fn completed_checkout_without_restaurant_is_malformed() {
        let parsed = BillingEvent::try_from(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({
                "metadata": {"planId": "monthly_50"},
                "customer": "cus_1",
                "subscription": "sub_1",
                "amount_total": 4900
            }),
        ));
        assert!(matches!(parsed, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn completed_checkout_with_unknown_plan_is_malformed() {
        let parsed = BillingEvent::try_from(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({
                "metadata": {"restaurantId": Uuid::new_v4().to_string(), "planId": "pay_per_order"},
                "customer": "cus_1",
                "subscription": "sub_1",
                "amount_total": 200
            }),
        ));
        assert!(matches!(parsed, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn invoice_periods_become_dates() {
        let parsed = BillingEvent::try_from(&event(
            INVOICE_PAYMENT_SUCCEEDED,
            json!({"subscription": "sub_1", "period_start": 1735689600, "period_end": 1738368000}),
        ))
        .unwrap();

        assert_eq!(
            parsed,
            BillingEvent::InvoicePaid(InvoicePaid {
                subscription: "sub_1".to_string(),
                period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                period_end: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            })
        );
    }

    #[test]
    fn invoice_with_string_period_is_malformed() {
        let parsed = BillingEvent::try_from(&event(
            INVOICE_PAYMENT_SUCCEEDED,
            json!({"subscription": "sub_1", "period_start": "yesterday", "period_end": 1738368000}),
        ));
        assert!(matches!(parsed, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn deleted_subscription_needs_customer() {
        let parsed = BillingEvent::try_from(&event(
            CUSTOMER_SUBSCRIPTION_DELETED,
            json!({"id": "sub_1", "customer": null}),
        ));
        assert!(matches!(parsed, Err(AppError::MalformedEvent(_))));
    }

    #[test]
    fn other_types_are_unhandled() {
        let parsed = BillingEvent::try_from(&event("charge.refunded", json!({}))).unwrap();
        assert_eq!(parsed, BillingEvent::Unhandled("charge.refunded".to_string()));
    }
}
