use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PaymentCreateRequest {
    pub order_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    pub amount: BigDecimal,
    pub currency: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_intent_id: String,
    pub status: String,
    pub fees_deducted: BigDecimal,
}
