use db::models::{order::Order, payment::Payment};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OrderWithPayment {
    #[serde(flatten)]
    pub order: Order,
    pub payment: Option<Payment>,
}
