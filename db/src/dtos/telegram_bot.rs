use uuid::Uuid;

pub struct BotCreateRequest {
    pub restaurant_id: Uuid,
    pub token: String,
    pub username: String,
}
