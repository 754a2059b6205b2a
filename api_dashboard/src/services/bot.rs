use common::error::{AppError, Res};
use db::{dtos::telegram_bot::BotCreateRequest, models::telegram_bot::TelegramBot};
use sqlx::PgPool;
use uuid::Uuid;

/// `"Luigi's  Pizza"` becomes `"Luigi's_Pizza_Orders_Bot"`.
pub(crate) fn bot_username(restaurant_name: &str) -> String {
    let name = restaurant_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}_Orders_Bot", name)
}

/// Bots are not registered with Telegram; the token only has the right shape.
pub(crate) fn placeholder_token() -> String {
    format!("0000000000:{}", Uuid::new_v4().simple())
}

pub(crate) async fn create_bot(
    pool: &PgPool,
    restaurant_id: Uuid,
    restaurant_name: &str,
) -> Res<TelegramBot> {
    if db::telegram_bot::get_bot_by_restaurant(pool, restaurant_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "A bot already exists for this restaurant".to_string(),
        ));
    }

    db::telegram_bot::insert_bot(
        pool,
        BotCreateRequest {
            restaurant_id,
            token: placeholder_token(),
            username: bot_username(restaurant_name),
        },
    )
    .await
}

pub(crate) async fn get_bot(pool: &PgPool, restaurant_id: Uuid) -> Res<TelegramBot> {
    db::telegram_bot::get_bot_by_restaurant(pool, restaurant_id)
        .await?
        .ok_or_else(not_found)
}

pub(crate) async fn set_active(pool: &PgPool, restaurant_id: Uuid, is_active: bool) -> Res<TelegramBot> {
    db::telegram_bot::set_active(pool, restaurant_id, is_active)
        .await?
        .ok_or_else(not_found)
}

pub(crate) async fn delete_bot(pool: &PgPool, restaurant_id: Uuid) -> Res<()> {
    match db::telegram_bot::delete_bot(pool, restaurant_id).await? {
        0 => Err(not_found()),
        _ => Ok(()),
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Bot not found".to_string())
}
