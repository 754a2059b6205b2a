use std::sync::Arc;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use common::{
    error::{AppError, Res},
    jwt::AuthUser,
};
use db::models::restaurant::Restaurant;
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use uuid::Uuid;

/// The authenticated user together with their restaurant, loaded from the
/// database for every request. Handlers never see a cached profile.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    pub restaurant: Restaurant,
}

impl Session {
    pub fn restaurant_id(&self) -> Uuid {
        self.restaurant.id
    }
}

/// Reads the user the auth middleware stored in the request extensions.
pub fn auth_user(req: &HttpRequest) -> Res<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = auth_user(req);
        let pool = req.app_data::<web::Data<Arc<PgPool>>>().cloned();

        Box::pin(async move {
            let user = user?;
            let pool =
                pool.ok_or_else(|| AppError::Internal("Database pool not configured".to_string()))?;

            let restaurant = db::restaurant::get_restaurant_by_id(pool.get_ref().as_ref(), user.user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Restaurant profile not found".to_string()))?;

            Ok(Session { user, restaurant })
        })
    }
}
