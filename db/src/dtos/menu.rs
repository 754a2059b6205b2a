use sqlx::types::BigDecimal;
use uuid::Uuid;

pub struct CategoryCreateRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: String,
}

pub struct ItemCreateRequest {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
}
