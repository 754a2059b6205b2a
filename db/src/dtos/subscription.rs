use chrono::NaiveDate;
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionCreateRequest {
    pub restaurant_id: Uuid,
    pub plan_type: String,
    pub stripe_subscription_id: String,
    pub start_date: NaiveDate,
    pub current_period_start: NaiveDate,
    pub current_period_end: NaiveDate,
    pub amount: BigDecimal,
}
