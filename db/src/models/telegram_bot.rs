use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TelegramBot {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub token: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}
