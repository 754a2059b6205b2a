use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub plan_type: String,
    pub status: String,
    pub stripe_subscription_id: String,
    pub start_date: NaiveDate,
    pub current_period_start: NaiveDate,
    pub current_period_end: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub amount: BigDecimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
