use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use api_auth::Session;
use common::{error::Res, http::Success};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{dtos::payment::OrderPaymentRequest, ledger::Ledger, services};

#[get("/orders")]
pub async fn get_orders(session: Session, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let orders = services::order::list_orders(&pool, session.restaurant_id()).await?;
    Success::ok(orders)
}

/// The order with its payment, when one was recorded.
#[get("/orders/{order_id}")]
pub async fn get_order(
    session: Session,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let order =
        services::order::get_order_with_payment(&pool, session.restaurant_id(), path.into_inner())
            .await?;
    Success::ok(order)
}

/// Pay-per-order charge. Counts the order against the plan quota and
/// answers `403` once the quota is spent.
#[post("/orders/{order_id}/pay")]
pub async fn post_pay_order(
    session: Session,
    path: web::Path<Uuid>,
    req: web::Json<OrderPaymentRequest>,
    ledger: web::Data<dyn Ledger>,
) -> Res<impl Responder> {
    let payment = services::order::pay_order(
        ledger.get_ref(),
        session.restaurant_id(),
        path.into_inner(),
        req.into_inner().amount,
    )
    .await?;
    Success::created(payment)
}
