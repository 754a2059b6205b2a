use common::{
    error::{AppError, Res},
    misc::OrderPaymentStatus,
};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::order::Order;

pub async fn get_orders_by_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Vec<Order>> {
    sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE restaurant_id = $1 ORDER BY created_at DESC",
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_order_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    order_id: Uuid,
) -> Res<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND restaurant_id = $2")
        .bind(order_id)
        .bind(restaurant_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Flips an unpaid order to paid. Returns 0 when the order is missing or
/// already paid, so only one of two concurrent payments gets through.
pub async fn mark_paid<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    order_id: Uuid,
    payment_intent_id: &str,
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE orders SET payment_status = $3, payment_intent_id = $4
        WHERE id = $1 AND restaurant_id = $2 AND payment_status <> $3
        "#,
    )
    .bind(order_id)
    .bind(restaurant_id)
    .bind(OrderPaymentStatus::Paid.to_string())
    .bind(payment_intent_id)
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}
