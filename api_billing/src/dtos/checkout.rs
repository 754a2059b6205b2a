use serde::{Deserialize, Serialize};

/// Body of `POST /stripe-checkout`. Both fields are optional on the wire so
/// a missing id is reported with the same errors as an unknown one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub restaurant_id: Option<String>,
    pub plan_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
}
