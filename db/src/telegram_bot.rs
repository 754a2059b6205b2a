use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::telegram_bot::BotCreateRequest, models::telegram_bot::TelegramBot};

pub async fn insert_bot<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: BotCreateRequest,
) -> Res<TelegramBot> {
    sqlx::query_as::<_, TelegramBot>(
        r#"
        INSERT INTO telegram_bots (restaurant_id, token, username, is_active)
        VALUES ($1, $2, $3, TRUE)
        RETURNING *
        "#,
    )
    .bind(data.restaurant_id)
    .bind(data.token)
    .bind(data.username)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_bot_by_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Option<TelegramBot>> {
    sqlx::query_as::<_, TelegramBot>("SELECT * FROM telegram_bots WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn set_active<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    is_active: bool,
) -> Res<Option<TelegramBot>> {
    sqlx::query_as::<_, TelegramBot>(
        "UPDATE telegram_bots SET is_active = $2 WHERE restaurant_id = $1 RETURNING *",
    )
    .bind(restaurant_id)
    .bind(is_active)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_bot<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM telegram_bots WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .execute(executor)
        .await
        .map(|res| res.rows_affected())
        .map_err(AppError::from)
}
