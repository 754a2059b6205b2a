use db::models::menu::{MenuCategory, MenuItem};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: BigDecimal,
}

/// New order of a list, first id first.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CategoryWithItems {
    #[serde(flatten)]
    pub category: MenuCategory,
    pub items: Vec<MenuItem>,
}
