use std::sync::Arc;

use actix_web::{Responder, get, put, web};
use api_auth::Session;
use common::{error::Res, http::Success, plan};
use sqlx::PgPool;

use crate::{dtos::restaurant::PlanRequest, services};

/// Lists every plan with its price and order quota.
#[get("/billing/plans")]
pub async fn get_plans() -> Res<impl Responder> {
    Success::ok(plan::catalog())
}

/// Moves the restaurant to another plan directly, without a checkout.
#[put("/billing/plan")]
pub async fn put_plan(
    session: Session,
    req: web::Json<PlanRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let restaurant =
        services::restaurant::change_plan(&pool, session.restaurant_id(), &req.plan_id).await?;
    Success::ok(restaurant)
}

/// Subscription records written by the payment webhook, newest first.
#[get("/billing/subscriptions")]
pub async fn get_subscriptions(
    session: Session,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let subscriptions =
        services::restaurant::list_subscriptions(&pool, session.restaurant_id()).await?;
    Success::ok(subscriptions)
}
