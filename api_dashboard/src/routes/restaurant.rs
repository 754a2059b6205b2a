use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use api_auth::Session;
use common::{error::Res, http::Success, jwt::AuthUser};
use sqlx::PgPool;

use crate::{dtos::restaurant::CreateRestaurantRequest, services};

/// Creates the restaurant profile of the signed-in account.
///
/// # Input
/// - `{ "name": "Luigi's Trattoria", "email": "optional@override.test" }`
///
/// # Output
/// - `201` with the stored restaurant (plan `monthly_50`, 50 orders)
/// - `400` when the profile already exists
#[post("/restaurant")]
pub async fn post_restaurant(
    user: web::ReqData<AuthUser>,
    req: web::Json<CreateRestaurantRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let restaurant = services::restaurant::create_profile(&pool, &user, req.into_inner()).await?;
    Success::created(restaurant)
}

/// Returns the restaurant of the current session, freshly loaded.
#[get("/session")]
pub async fn get_session(session: Session) -> Res<impl Responder> {
    Success::ok(session.restaurant)
}
