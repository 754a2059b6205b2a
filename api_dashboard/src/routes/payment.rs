use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use api_auth::Session;
use chrono::Utc;
use common::{error::Res, http::Success};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::payment::{RefundRequest, SubscriptionPaymentRequest},
    ledger::Ledger,
    services,
};

/// Payment history of the restaurant, newest first.
#[get("/payments")]
pub async fn get_payments(session: Session, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let payments = services::payment::list_payments(&pool, session.restaurant_id()).await?;
    Success::ok(payments)
}

/// Records a simulated monthly payment for `planId` and switches the
/// restaurant to it. Billing dates become today and today + 30 days.
#[post("/payments/subscription")]
pub async fn post_subscription_payment(
    session: Session,
    req: web::Json<SubscriptionPaymentRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let payment = services::payment::record_subscription_payment(
        &pool,
        session.restaurant_id(),
        &req.plan_id,
        Utc::now().date_naive(),
    )
    .await?;
    Success::created(payment)
}

/// Refunds part or all of a payment.
///
/// # Input
/// - optional `{ "amount": 10.5 }`; without it the remaining balance is refunded
///
/// # Output
/// - `200` with the updated payment, `400` when the refund exceeds the balance
#[post("/payments/{payment_id}/refund")]
pub async fn post_refund(
    session: Session,
    path: web::Path<Uuid>,
    req: Option<web::Json<RefundRequest>>,
    ledger: web::Data<dyn Ledger>,
) -> Res<impl Responder> {
    let requested = req.map(|req| req.into_inner()).unwrap_or_default().amount;
    let payment = services::payment::refund_payment(
        ledger.get_ref(),
        session.restaurant_id(),
        path.into_inner(),
        requested,
    )
    .await?;
    Success::ok(payment)
}
