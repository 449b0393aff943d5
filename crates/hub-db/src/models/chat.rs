//! Chat database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ChatRoomModel {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub max_members: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChatRoomViewModel {
    #[sqlx(flatten)]
    pub room: ChatRoomModel,
    pub member_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub kind: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
