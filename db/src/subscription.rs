use chrono::NaiveDate;
use common::{
    error::{AppError, Res},
    misc::SubscriptionStatus,
};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::subscription::SubscriptionCreateRequest, models::subscription::Subscription};

/// Inserts an active subscription. A row with the same
/// `stripe_subscription_id` is left untouched, so replays are harmless.
/// Returns `true` when a row was created.
pub async fn insert_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: SubscriptionCreateRequest,
) -> Res<bool> {
    sqlx::query(
        r#"
        INSERT INTO subscriptions (restaurant_id, plan_type, status, stripe_subscription_id, start_date, current_period_start, current_period_end, amount)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (stripe_subscription_id) DO NOTHING
        "#,
    )
    .bind(data.restaurant_id)
    .bind(data.plan_type)
    .bind(SubscriptionStatus::Active.to_string())
    .bind(data.stripe_subscription_id)
    .bind(data.start_date)
    .bind(data.current_period_start)
    .bind(data.current_period_end)
    .bind(data.amount)
    .execute(executor)
    .await
    .map(|res| res.rows_affected() == 1)
    .map_err(AppError::from)
}

/// Cancelled subscriptions are terminal and keep their last period.
pub async fn update_period<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_subscription_id: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE subscriptions
        SET current_period_start = $2, current_period_end = $3, status = $4, updated_at = NOW()
        WHERE stripe_subscription_id = $1 AND status <> $5
        "#,
    )
    .bind(stripe_subscription_id)
    .bind(period_start)
    .bind(period_end)
    .bind(SubscriptionStatus::Active.to_string())
    .bind(SubscriptionStatus::Cancelled.to_string())
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}

/// `end_date` is set once; a replayed deletion matches no row.
pub async fn cancel<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_subscription_id: &str,
    end_date: NaiveDate,
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE subscriptions
        SET status = $2, end_date = $3, updated_at = NOW()
        WHERE stripe_subscription_id = $1 AND status <> $2
        "#,
    )
    .bind(stripe_subscription_id)
    .bind(SubscriptionStatus::Cancelled.to_string())
    .bind(end_date)
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}

pub async fn get_subscriptions_by_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Vec<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE restaurant_id = $1 ORDER BY created_at DESC",
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
