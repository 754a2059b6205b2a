use std::sync::Arc;

use actix_web::{Responder, delete, get, post, put, web};
use api_auth::Session;
use common::{error::Res, http::Success};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::menu::{CategoryRequest, ItemRequest, OrderRequest},
    ledger::Ledger,
    services,
};

/// Categories by position, each with its items by position.
#[get("/menu")]
pub async fn get_menu(session: Session, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let menu = services::menu::get_menu(&pool, session.restaurant_id()).await?;
    Success::ok(menu)
}

/// Applies a drag-and-drop result: `{ "ids": [...] }` in display order.
#[put("/menu/categories/order")]
pub async fn put_category_order(
    session: Session,
    req: web::Json<OrderRequest>,
    ledger: web::Data<dyn Ledger>,
) -> Res<impl Responder> {
    services::menu::reorder_categories(ledger.get_ref(), session.restaurant_id(), &req.ids)
        .await?;
    Success::no_content()
}

#[put("/menu/categories/{category_id}/items/order")]
pub async fn put_item_order(
    session: Session,
    path: web::Path<Uuid>,
    req: web::Json<OrderRequest>,
    ledger: web::Data<dyn Ledger>,
) -> Res<impl Responder> {
    services::menu::reorder_items(
        ledger.get_ref(),
        session.restaurant_id(),
        path.into_inner(),
        &req.ids,
    )
    .await?;
    Success::no_content()
}

/// New categories are appended after the existing ones.
#[post("/menu/categories")]
pub async fn post_category(
    session: Session,
    req: web::Json<CategoryRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let category =
        services::menu::create_category(&pool, session.restaurant_id(), req.into_inner()).await?;
    Success::created(category)
}

#[put("/menu/categories/{category_id}")]
pub async fn put_category(
    session: Session,
    path: web::Path<Uuid>,
    req: web::Json<CategoryRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let category = services::menu::update_category(
        &pool,
        session.restaurant_id(),
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Success::ok(category)
}

/// Deleting a category deletes its items.
#[delete("/menu/categories/{category_id}")]
pub async fn delete_category(
    session: Session,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::menu::delete_category(&pool, session.restaurant_id(), path.into_inner()).await?;
    Success::no_content()
}

#[post("/menu/categories/{category_id}/items")]
pub async fn post_item(
    session: Session,
    path: web::Path<Uuid>,
    req: web::Json<ItemRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let item = services::menu::create_item(
        &pool,
        session.restaurant_id(),
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Success::created(item)
}

#[delete("/menu/items/{item_id}")]
pub async fn delete_item(
    session: Session,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::menu::delete_item(&pool, session.restaurant_id(), path.into_inner()).await?;
    Success::no_content()
}
