use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscription_plan: String,
    pub payment_method: String,
    pub status: String,
    pub order_limit: Option<i32>,
    pub orders_used: i32,
    pub stripe_customer_id: Option<String>,
    pub last_billing_date: Option<NaiveDate>,
    pub next_billing_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
