use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    pub amount: BigDecimal,
    pub currency: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_intent_id: String,
    pub status: String,
    pub refunded_amount: BigDecimal,
    pub fees_deducted: BigDecimal,
    pub created_at: NaiveDateTime,
}
