use chrono::NaiveDate;
use common::{
    error::{AppError, Res},
    misc::RestaurantStatus,
};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::restaurant::{PlanActivation, RestaurantCreateRequest},
    models::restaurant::Restaurant,
};

pub async fn get_restaurant_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
        .bind(restaurant_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn exists_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM restaurants WHERE id = $1)")
        .bind(restaurant_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: RestaurantCreateRequest,
) -> Res<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        r#"
        INSERT INTO restaurants (id, name, email, subscription_plan, payment_method, status, order_limit, orders_used)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 0)
        RETURNING *
        "#,
    )
    .bind(data.id)
    .bind(data.name)
    .bind(data.email)
    .bind(data.subscription_plan)
    .bind(data.payment_method)
    .bind(RestaurantStatus::Active.to_string())
    .bind(data.order_limit)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Marks the restaurant as a paying customer of `subscription_plan`.
/// Returns the number of rows touched.
pub async fn activate_plan<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PlanActivation,
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE restaurants
        SET subscription_plan = $2, stripe_customer_id = $3, status = $4, order_limit = $5, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(data.restaurant_id)
    .bind(data.subscription_plan)
    .bind(data.stripe_customer_id)
    .bind(RestaurantStatus::Active.to_string())
    .bind(data.order_limit)
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}

pub async fn update_status_by_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_customer_id: &str,
    status: RestaurantStatus,
) -> Res<u64> {
    sqlx::query(
        "UPDATE restaurants SET status = $2, updated_at = NOW() WHERE stripe_customer_id = $1",
    )
    .bind(stripe_customer_id)
    .bind(status.to_string())
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}

pub async fn update_plan<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    subscription_plan: &str,
    order_limit: Option<i32>,
) -> Res<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        r#"
        UPDATE restaurants
        SET subscription_plan = $2, order_limit = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(restaurant_id)
    .bind(subscription_plan)
    .bind(order_limit)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Records a paid billing period for `subscription_plan`.
pub async fn update_billing_dates<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    subscription_plan: &str,
    order_limit: Option<i32>,
    last_billing_date: NaiveDate,
    next_billing_date: NaiveDate,
) -> Res<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        r#"
        UPDATE restaurants
        SET subscription_plan = $2, order_limit = $3, last_billing_date = $4, next_billing_date = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(restaurant_id)
    .bind(subscription_plan)
    .bind(order_limit)
    .bind(last_billing_date)
    .bind(next_billing_date)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Counts one more order against the quota. The guard keeps
/// `orders_used <= order_limit`; returns `false` when the quota is spent.
pub async fn increment_orders_used<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<bool> {
    sqlx::query(
        r#"
        UPDATE restaurants
        SET orders_used = orders_used + 1, updated_at = NOW()
        WHERE id = $1 AND (order_limit IS NULL OR orders_used < order_limit)
        "#,
    )
    .bind(restaurant_id)
    .execute(executor)
    .await
    .map(|res| res.rows_affected() == 1)
    .map_err(AppError::from)
}
