use common::{
    error::{AppError, Res},
    misc::PaymentStatus,
};
use sqlx::{Executor, Postgres, types::BigDecimal};
use uuid::Uuid;

use crate::{dtos::payment::PaymentCreateRequest, models::payment::Payment};

pub async fn insert_payment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PaymentCreateRequest,
) -> Res<Payment> {
    sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (order_id, restaurant_id, amount, currency, payment_method, transaction_id, payment_intent_id, status, refunded_amount, fees_deducted)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9)
        RETURNING *
        "#,
    )
    .bind(data.order_id)
    .bind(data.restaurant_id)
    .bind(data.amount)
    .bind(data.currency)
    .bind(data.payment_method)
    .bind(data.transaction_id)
    .bind(data.payment_intent_id)
    .bind(data.status)
    .bind(data.fees_deducted)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_payment_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    payment_id: Uuid,
) -> Res<Option<Payment>> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 AND restaurant_id = $2")
        .bind(payment_id)
        .bind(restaurant_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_payment_by_intent<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    payment_intent_id: &str,
) -> Res<Option<Payment>> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE payment_intent_id = $1 LIMIT 1")
        .bind(payment_intent_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_payments_by_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Vec<Payment>> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE restaurant_id = $1 ORDER BY created_at DESC",
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// Adds `refund` to the payment's refunded total in one statement. The
/// guard keeps `refunded_amount <= amount` under concurrent refunds; `None`
/// when the payment is missing, not refundable, or the refund would exceed
/// the balance.
pub async fn add_refund<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    payment_id: Uuid,
    refund: BigDecimal,
) -> Res<Option<Payment>> {
    sqlx::query_as::<_, Payment>(
        r#"
        UPDATE payments
        SET refunded_amount = refunded_amount + $3, status = $4
        WHERE id = $1 AND restaurant_id = $2
          AND status IN ($4, $5)
          AND refunded_amount + $3 <= amount
        RETURNING *
        "#,
    )
    .bind(payment_id)
    .bind(restaurant_id)
    .bind(refund)
    .bind(PaymentStatus::Refunded.to_string())
    .bind(PaymentStatus::Succeeded.to_string())
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
