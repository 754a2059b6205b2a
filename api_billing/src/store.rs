use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{error::Res, misc::RestaurantStatus};
use db::{
    dtos::{restaurant::PlanActivation, subscription::SubscriptionCreateRequest},
    models::restaurant::Restaurant,
};
use sqlx::PgPool;
use uuid::Uuid;

/// The stored records the billing endpoints read and write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn find_restaurant(&self, restaurant_id: Uuid) -> Res<Option<Restaurant>>;

    async fn activate_restaurant_plan(&self, activation: PlanActivation) -> Res<u64>;

    /// `false` when a subscription with the same gateway id already exists.
    async fn insert_subscription(&self, subscription: SubscriptionCreateRequest) -> Res<bool>;

    async fn update_subscription_period(
        &self,
        stripe_subscription_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Res<u64>;

    async fn deactivate_restaurant_by_customer(&self, stripe_customer_id: &str) -> Res<u64>;

    async fn cancel_subscription(&self, stripe_subscription_id: &str, end_date: NaiveDate)
    -> Res<u64>;
}

pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl BillingStore for PgStore {
    async fn find_restaurant(&self, restaurant_id: Uuid) -> Res<Option<Restaurant>> {
        db::restaurant::get_restaurant_by_id(&*self.pool, restaurant_id).await
    }

    async fn activate_restaurant_plan(&self, activation: PlanActivation) -> Res<u64> {
        db::restaurant::activate_plan(&*self.pool, activation).await
    }

    async fn insert_subscription(&self, subscription: SubscriptionCreateRequest) -> Res<bool> {
        db::subscription::insert_subscription(&*self.pool, subscription).await
    }

    async fn update_subscription_period(
        &self,
        stripe_subscription_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Res<u64> {
        db::subscription::update_period(&*self.pool, stripe_subscription_id, period_start, period_end)
            .await
    }

    async fn deactivate_restaurant_by_customer(&self, stripe_customer_id: &str) -> Res<u64> {
        db::restaurant::update_status_by_customer(
            &*self.pool,
            stripe_customer_id,
            RestaurantStatus::Inactive,
        )
        .await
    }

    async fn cancel_subscription(
        &self,
        stripe_subscription_id: &str,
        end_date: NaiveDate,
    ) -> Res<u64> {
        db::subscription::cancel(&*self.pool, stripe_subscription_id, end_date).await
    }
}
