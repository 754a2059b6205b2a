use serde::Deserialize;
use sqlx::types::BigDecimal;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPaymentRequest {
    pub plan_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefundRequest {
    /// Defaults to everything not refunded yet.
    pub amount: Option<BigDecimal>,
}

#[derive(Debug, Deserialize)]
pub struct OrderPaymentRequest {
    pub amount: BigDecimal,
}
