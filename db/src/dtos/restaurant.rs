use uuid::Uuid;

pub struct RestaurantCreateRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscription_plan: String,
    pub payment_method: String,
    pub order_limit: Option<i32>,
}

/// Fields written when a paid checkout completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanActivation {
    pub restaurant_id: Uuid,
    pub subscription_plan: String,
    pub stripe_customer_id: String,
    pub order_limit: Option<i32>,
}
