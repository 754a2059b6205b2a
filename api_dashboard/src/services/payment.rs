use chrono::{Duration, NaiveDate};
use common::{
    error::{AppError, Res},
    misc::{DEFAULT_CURRENCY, GATEWAY_PAYMENT_METHOD, PaymentStatus},
    plan::{BILLING_PERIOD_DAYS, Plan},
};
use db::{dtos::payment::PaymentCreateRequest, models::payment::Payment};
use sqlx::{PgPool, types::BigDecimal};
use uuid::Uuid;

use crate::ledger::Ledger;

/// Card processing fee: 2.9% + 0.30, rounded to cents.
pub(crate) fn processing_fee(amount: &BigDecimal) -> BigDecimal {
    let rate = BigDecimal::new(29.into(), 3);
    let fixed = BigDecimal::new(30.into(), 2);
    (amount * rate + fixed).round(2)
}

/// Minor units to a money amount.
pub(crate) fn from_minor_units(minor: i64) -> BigDecimal {
    BigDecimal::new(minor.into(), 2)
}

/// Returns the amount to refund now. Without an explicit amount the
/// remaining balance is refunded.
pub(crate) fn refund_amount(
    amount: &BigDecimal,
    refunded: &BigDecimal,
    requested: Option<BigDecimal>,
) -> Res<BigDecimal> {
    let remaining = amount - refunded;
    let zero = BigDecimal::from(0);
    if remaining <= zero {
        return Err(AppError::InvalidArgument(
            "Payment is already fully refunded".to_string(),
        ));
    }

    let refund = requested.unwrap_or_else(|| remaining.clone());
    if refund <= zero {
        return Err(AppError::InvalidArgument(
            "Refund amount must be positive".to_string(),
        ));
    }
    if refund > remaining {
        return Err(AppError::InvalidArgument(
            "Refund exceeds the remaining balance".to_string(),
        ));
    }
    Ok(refund)
}

/// Simulated gateway references for a recorded payment.
pub(crate) fn transaction_refs() -> (String, String) {
    (
        format!("txn_{}", Uuid::new_v4().simple()),
        format!("pi_{}", Uuid::new_v4().simple()),
    )
}

pub(crate) fn succeeded_payment(
    restaurant_id: Uuid,
    order_id: Option<Uuid>,
    amount: BigDecimal,
) -> PaymentCreateRequest {
    let (transaction_id, payment_intent_id) = transaction_refs();
    PaymentCreateRequest {
        order_id,
        restaurant_id,
        fees_deducted: processing_fee(&amount),
        amount,
        currency: DEFAULT_CURRENCY.to_string(),
        payment_method: GATEWAY_PAYMENT_METHOD.to_string(),
        transaction_id,
        payment_intent_id,
        status: PaymentStatus::Succeeded.to_string(),
    }
}

pub(crate) async fn list_payments(pool: &PgPool, restaurant_id: Uuid) -> Res<Vec<Payment>> {
    db::payment::get_payments_by_restaurant(pool, restaurant_id).await
}

/// Records one paid month of `plan_id` and moves the restaurant onto it.
pub(crate) async fn record_subscription_payment(
    pool: &PgPool,
    restaurant_id: Uuid,
    plan_id: &str,
    today: NaiveDate,
) -> Res<Payment> {
    let plan = Plan::checkout(plan_id)
        .ok_or_else(|| AppError::InvalidArgument("Invalid plan selected".to_string()))?;
    let price = plan
        .monthly_price()
        .ok_or_else(|| AppError::InvalidArgument("Invalid plan selected".to_string()))?;

    let mut tx = pool.begin().await?;
    let payment = db::payment::insert_payment(
        &mut *tx,
        succeeded_payment(restaurant_id, None, from_minor_units(price)),
    )
    .await?;
    db::restaurant::update_billing_dates(
        &mut *tx,
        restaurant_id,
        plan.as_str(),
        plan.order_limit(),
        today,
        today + Duration::days(BILLING_PERIOD_DAYS),
    )
    .await?;
    tx.commit().await?;

    log::info!(
        "Recorded {} subscription payment {} for restaurant {}",
        plan,
        payment.id,
        restaurant_id
    );
    Ok(payment)
}

/// Refunds part or all of a payment. The balance check is repeated by the
/// write itself, so two concurrent refunds cannot exceed the amount paid.
pub(crate) async fn refund_payment(
    ledger: &dyn Ledger,
    restaurant_id: Uuid,
    payment_id: Uuid,
    requested: Option<BigDecimal>,
) -> Res<Payment> {
    let payment = ledger
        .find_payment(restaurant_id, payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    match PaymentStatus::parse(&payment.status) {
        Some(PaymentStatus::Succeeded) | Some(PaymentStatus::Refunded) => {}
        _ => {
            return Err(AppError::InvalidArgument(format!(
                "Cannot refund a {} payment",
                payment.status
            )));
        }
    }

    let refund = refund_amount(&payment.amount, &payment.refunded_amount, requested)?;
    ledger
        .add_refund(restaurant_id, payment.id, refund)
        .await?
        .ok_or_else(|| {
            AppError::InvalidArgument("Refund exceeds the remaining balance".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MockLedger;
    use std::str::FromStr;

    fn money(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn fee_is_percentage_plus_fixed() {
        assert_eq!(processing_fee(&money("49.00")), money("1.72"));
        assert_eq!(processing_fee(&money("2.00")), money("0.36"));
        assert_eq!(processing_fee(&money("0")), money("0.30"));
    }

    #[test]
    fn minor_units() {
        assert_eq!(from_minor_units(4900), money("49.00"));
        assert_eq!(from_minor_units(19900), money("199"));
    }

    #[test]
    fn refund_defaults_to_remaining_balance() {
        assert_eq!(
            refund_amount(&money("99.00"), &money("0"), None).unwrap(),
            money("99.00")
        );
        assert_eq!(
            refund_amount(&money("99.00"), &money("40.00"), None).unwrap(),
            money("59.00")
        );
    }

    #[test]
    fn partial_refund_up_to_balance() {
        assert_eq!(
            refund_amount(&money("49.00"), &money("10.00"), Some(money("39.00"))).unwrap(),
            money("39.00")
        );
    }

    #[test]
    fn over_refund_is_rejected() {
        assert!(matches!(
            refund_amount(&money("49.00"), &money("40.00"), Some(money("9.01"))),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            refund_amount(&money("49.00"), &money("49.00"), None),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            refund_amount(&money("49.00"), &money("0"), Some(money("-1"))),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn recorded_payment_shape() {
        let restaurant_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();
        let payment = succeeded_payment(restaurant_id, Some(order_id), money("2.00"));

        assert_eq!(payment.status, "succeeded");
        assert_eq!(payment.currency, "usd");
        assert_eq!(payment.payment_method, "stripe");
        assert_eq!(payment.fees_deducted, money("0.36"));
        assert!(payment.transaction_id.starts_with("txn_"));
        assert!(payment.payment_intent_id.starts_with("pi_"));
        assert_eq!(payment.order_id, Some(order_id));
    }

    fn stored_payment(restaurant_id: Uuid, status: &str, refunded: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            order_id: None,
            restaurant_id,
            amount: money("49.00"),
            currency: "usd".to_string(),
            payment_method: "stripe".to_string(),
            transaction_id: "txn_1".to_string(),
            payment_intent_id: "pi_1".to_string(),
            status: status.to_string(),
            refunded_amount: money(refunded),
            fees_deducted: money("1.72"),
            created_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    fn ledger_with(payment: Option<Payment>) -> MockLedger {
        let mut ledger = MockLedger::new();
        ledger
            .expect_find_payment()
            .times(1)
            .returning(move |_, _| Ok(payment.clone()));
        ledger
    }

    #[actix_web::test]
    async fn refund_adds_the_remaining_balance() {
        let restaurant_id = Uuid::new_v4();
        let payment = stored_payment(restaurant_id, "refunded", "10.00");
        let payment_id = payment.id;
        let mut refunded = payment.clone();
        refunded.refunded_amount = money("49.00");
        let mut ledger = ledger_with(Some(payment));
        ledger
            .expect_add_refund()
            .withf(move |r, p, refund| *r == restaurant_id && *p == payment_id && *refund == money("39.00"))
            .times(1)
            .returning(move |_, _, _| Ok(Some(refunded.clone())));

        let payment = refund_payment(&ledger, restaurant_id, payment_id, None).await.unwrap();
        assert_eq!(payment.refunded_amount, money("49.00"));
    }

    #[actix_web::test]
    async fn refund_losing_a_race_is_rejected() {
        let restaurant_id = Uuid::new_v4();
        let payment = stored_payment(restaurant_id, "succeeded", "0");
        let payment_id = payment.id;
        let mut ledger = ledger_with(Some(payment));
        // a concurrent refund already took the balance
        ledger
            .expect_add_refund()
            .times(1)
            .returning(|_, _, _| Ok(None));

        match refund_payment(&ledger, restaurant_id, payment_id, Some(money("49.00"))).await {
            Err(AppError::InvalidArgument(message)) => {
                assert_eq!(message, "Refund exceeds the remaining balance")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn over_refund_is_rejected_before_writing() {
        let restaurant_id = Uuid::new_v4();
        let payment = stored_payment(restaurant_id, "succeeded", "40.00");
        let payment_id = payment.id;
        let ledger = ledger_with(Some(payment));

        assert!(matches!(
            refund_payment(&ledger, restaurant_id, payment_id, Some(money("9.01"))).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[actix_web::test]
    async fn pending_payment_cannot_be_refunded() {
        let restaurant_id = Uuid::new_v4();
        let payment = stored_payment(restaurant_id, "pending", "0");
        let payment_id = payment.id;
        let ledger = ledger_with(Some(payment));

        assert!(matches!(
            refund_payment(&ledger, restaurant_id, payment_id, None).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[actix_web::test]
    async fn unknown_payment_is_not_found() {
        let ledger = ledger_with(None);

        assert!(matches!(
            refund_payment(&ledger, Uuid::new_v4(), Uuid::new_v4(), None).await,
            Err(AppError::NotFound(_))
        ));
    }
}
