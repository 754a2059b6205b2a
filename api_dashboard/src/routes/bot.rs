use std::sync::Arc;

use actix_web::{Responder, delete, get, patch, post, web};
use api_auth::Session;
use common::{error::Res, http::Success};
use sqlx::PgPool;

use crate::{dtos::bot::UpdateBotRequest, services};

/// Sets up the restaurant's ordering bot. One bot per restaurant.
#[post("/bot")]
pub async fn post_bot(session: Session, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let bot =
        services::bot::create_bot(&pool, session.restaurant_id(), &session.restaurant.name).await?;
    Success::created(bot)
}

#[get("/bot")]
pub async fn get_bot(session: Session, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let bot = services::bot::get_bot(&pool, session.restaurant_id()).await?;
    Success::ok(bot)
}

/// `{ "isActive": false }` pauses the bot.
#[patch("/bot")]
pub async fn patch_bot(
    session: Session,
    req: web::Json<UpdateBotRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let bot = services::bot::set_active(&pool, session.restaurant_id(), req.is_active).await?;
    Success::ok(bot)
}

#[delete("/bot")]
pub async fn delete_bot(session: Session, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    services::bot::delete_bot(&pool, session.restaurant_id()).await?;
    Success::no_content()
}
