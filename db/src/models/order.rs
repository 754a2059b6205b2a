use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub order_items: serde_json::Value,
    pub subtotal: BigDecimal,
    pub tax_amount: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total_amount: BigDecimal,
    pub status: String,
    pub payment_status: String,
    pub payment_intent_id: Option<String>,
    pub special_instructions: Option<String>,
    pub estimated_pickup_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}
