use common::{
    error::{AppError, Res},
    jwt::AuthUser,
    misc::DEFAULT_PAYMENT_METHOD,
    plan::Plan,
};
use db::{
    dtos::restaurant::RestaurantCreateRequest,
    models::{restaurant::Restaurant, subscription::Subscription},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::restaurant::CreateRestaurantRequest;

/// Plan every new restaurant starts on.
pub const SIGNUP_PLAN: Plan = Plan::Monthly50;

pub(crate) fn signup_profile(
    user: &AuthUser,
    req: CreateRestaurantRequest,
) -> Res<RestaurantCreateRequest> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidArgument(
            "Restaurant name is required".to_string(),
        ));
    }
    let email = req
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .or_else(|| user.email.clone())
        .ok_or_else(|| AppError::InvalidArgument("Email is required".to_string()))?;

    Ok(RestaurantCreateRequest {
        id: user.user_id,
        name: name.to_string(),
        email,
        subscription_plan: SIGNUP_PLAN.as_str().to_string(),
        payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        order_limit: SIGNUP_PLAN.order_limit(),
    })
}

pub(crate) async fn create_profile(
    pool: &PgPool,
    user: &AuthUser,
    req: CreateRestaurantRequest,
) -> Res<Restaurant> {
    let profile = signup_profile(user, req)?;

    if db::restaurant::exists_restaurant(pool, user.user_id).await? {
        return Err(AppError::BadRequest(
            "Restaurant profile already exists".to_string(),
        ));
    }

    let restaurant = db::restaurant::insert_restaurant(pool, profile).await?;
    log::info!("Restaurant {} created for user {}", restaurant.id, user.user_id);
    Ok(restaurant)
}

/// Switches plans without going through the gateway.
pub(crate) async fn change_plan(pool: &PgPool, restaurant_id: Uuid, plan_id: &str) -> Res<Restaurant> {
    let plan = plan_id.parse::<Plan>()?;
    db::restaurant::update_plan(pool, restaurant_id, plan.as_str(), plan.order_limit()).await
}

pub(crate) async fn list_subscriptions(pool: &PgPool, restaurant_id: Uuid) -> Res<Vec<Subscription>> {
    db::subscription::get_subscriptions_by_restaurant(pool, restaurant_id).await
}
